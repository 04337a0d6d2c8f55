// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Browser bindings. Only compiled with the `wasm` feature.
//!
//! Errors cross the boundary as strings of the form `"<Kind>: <message>"`,
//! where `<Kind>` is [`StegoError::kind`], so the host can branch on it.

use js_sys::{Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;

use crate::stego::{self, crypto, FileEntry, NoteStyle, StegoError};

fn js_err(e: StegoError) -> JsValue {
    JsValue::from_str(&format!("{}: {e}", e.kind()))
}

fn set(obj: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(obj, &JsValue::from_str(key), value).map(|_| ())
}

fn encode_result(out: stego::EncodeOutput) -> Result<JsValue, JsValue> {
    let obj = Object::new();
    set(&obj, "png", &Uint8Array::from(out.png.as_slice()).into())?;
    set(&obj, "note", &JsValue::from_str(&out.note))?;
    set(&obj, "width", &JsValue::from(out.width))?;
    set(&obj, "height", &JsValue::from(out.height))?;
    Ok(obj.into())
}

fn password(p: Option<String>) -> Option<String> {
    p.filter(|p| !p.is_empty())
}

/// Hide a file in a cover image. Returns `{ png, note, width, height }`.
#[wasm_bindgen]
pub fn encode(
    file_name: &str,
    content: &[u8],
    carrier: &[u8],
    note: &str,
    password: Option<String>,
) -> Result<JsValue, JsValue> {
    let file = FileEntry::new(file_name, content);
    let pw = self::password(password);
    let out = stego::encode(&file, Some(carrier), note, pw.as_deref()).map_err(js_err)?;
    encode_result(out)
}

/// Hide a file in a generated noise image. Returns `{ png, note, width, height }`.
#[wasm_bindgen(js_name = encodeQuick)]
pub fn encode_quick(
    file_name: &str,
    content: &[u8],
    note: &str,
    password: Option<String>,
) -> Result<JsValue, JsValue> {
    let file = FileEntry::new(file_name, content);
    let pw = self::password(password);
    let out = stego::encode(&file, None, note, pw.as_deref()).map_err(js_err)?;
    encode_result(out)
}

/// Recover a hidden file. Returns `{ fileName, content, mimeType }`.
#[wasm_bindgen]
pub fn decode(carrier: &[u8], note: &str, password: Option<String>) -> Result<JsValue, JsValue> {
    let pw = self::password(password);
    let file = stego::decode(carrier, note, pw.as_deref()).map_err(js_err)?;
    let obj = Object::new();
    set(&obj, "fileName", &JsValue::from_str(&file.filename))?;
    set(&obj, "mimeType", &JsValue::from_str(file.mime_type()))?;
    set(&obj, "content", &Uint8Array::from(file.content.as_slice()).into())?;
    Ok(obj.into())
}

/// Capacity of a cover image for a file of `file_size` bytes.
/// Returns `{ capacityBits, requiredBits, fits, maxFileSize, usage }`.
#[wasm_bindgen]
pub fn capacity(carrier: &[u8], file_size: f64) -> Result<JsValue, JsValue> {
    let info = stego::capacity(carrier, file_size.max(0.0) as u64).map_err(js_err)?;
    let obj = Object::new();
    set(&obj, "capacityBits", &JsValue::from(info.capacity_bits as f64))?;
    set(&obj, "requiredBits", &JsValue::from(info.required_bits as f64))?;
    set(&obj, "fits", &JsValue::from_bool(info.fits))?;
    set(&obj, "maxFileSize", &JsValue::from(info.max_file_size as f64))?;
    set(&obj, "usage", &JsValue::from(info.usage()))?;
    Ok(obj.into())
}

/// Fresh security note. `token = true` gives a 24-character token instead of a phrase.
#[wasm_bindgen(js_name = generateNote)]
pub fn generate_note(token: bool) -> String {
    let style = if token { NoteStyle::Token } else { NoteStyle::Phrase };
    stego::generate_note(style)
}

/// Lowercase hex SHA-256 of `data`.
#[wasm_bindgen(js_name = sha256Hex)]
pub fn sha256_hex(data: &[u8]) -> String {
    crypto::hash_hex(data)
}
