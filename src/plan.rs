//! Loading and decoding of the YAML generation plan.
//!
//! The plan is a single YAML document whose top-level `chat_completions`
//! key holds an ordered list of request records. Records are kept as raw
//! YAML values at load time; fields are only extracted when a record is
//! reached in the run loop, so a malformed record does not prevent the
//! records before it from completing.

use crate::error::{Error, Result};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level key the request list lives under.
const PLAN_ROOT_KEY: &str = "chat_completions";

/// Loads the plan file and returns its request records in file order.
///
/// # Errors
///
/// Returns an error if the file is unreadable, is not valid YAML, lacks
/// the `chat_completions` key, or that key does not hold a sequence.
pub fn load_plan(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

    let document: Value =
        serde_yaml::from_str(&content).map_err(|e| Error::plan(path, e.to_string()))?;

    let records = document
        .get(PLAN_ROOT_KEY)
        .ok_or_else(|| Error::plan(path, format!("missing top-level key '{PLAN_ROOT_KEY}'")))?;

    let sequence = records.as_sequence().ok_or_else(|| {
        Error::plan(path, format!("'{PLAN_ROOT_KEY}' must hold a sequence"))
    })?;

    Ok(sequence.clone())
}

/// One fully decoded request record.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    /// Prompt content taken from the first entry of `messages`
    pub content: String,

    /// Sampling temperature
    pub temperature: f64,

    /// Nucleus sampling parameter
    pub top_p: f64,

    /// Model identifier
    pub model: String,

    /// Completion token budget
    pub max_completion_tokens: u32,

    /// Destination file for the generated page
    pub path: PathBuf,

    /// Title used for the slug and the link text
    pub title: String,
}

impl RequestSpec {
    /// Decodes one plan record.
    ///
    /// Every field is required; nothing is defaulted. Only the first
    /// entry of `messages` is consulted, and only its `content` — the
    /// `role` given in the plan is ignored, requests always go out with
    /// the `user` role.
    ///
    /// # Errors
    ///
    /// Returns an error naming the record index and field when a field
    /// is absent or has the wrong type.
    pub fn from_entry(index: usize, entry: &Value) -> Result<Self> {
        let messages = require(entry, index, "messages")?;
        let content = first_message_content(messages, index)?;

        let temperature = as_f64(require(entry, index, "temperature")?, index, "temperature")?;
        let top_p = as_f64(require(entry, index, "top_p")?, index, "top_p")?;
        let model = as_str(require(entry, index, "model")?, index, "model")?;
        let max_completion_tokens = as_u32(
            require(entry, index, "max_completion_tokens")?,
            index,
            "max_completion_tokens",
        )?;
        let path = as_str(require(entry, index, "path")?, index, "path")?;
        let title = as_str(require(entry, index, "title")?, index, "title")?;

        Ok(Self {
            content,
            temperature,
            top_p,
            model,
            max_completion_tokens,
            path: PathBuf::from(path),
            title,
        })
    }
}

fn require<'a>(entry: &'a Value, index: usize, field: &str) -> Result<&'a Value> {
    entry
        .get(field)
        .ok_or_else(|| Error::missing_field(index, field))
}

fn first_message_content(messages: &Value, index: usize) -> Result<String> {
    let sequence = messages
        .as_sequence()
        .ok_or_else(|| Error::invalid_field(index, "messages", "must be a sequence"))?;

    let first = sequence
        .first()
        .ok_or_else(|| Error::invalid_field(index, "messages", "sequence is empty"))?;

    let content = first
        .get("content")
        .ok_or_else(|| Error::invalid_field(index, "messages", "first entry has no 'content'"))?;

    as_str(content, index, "messages")
}

fn as_str(value: &Value, index: usize, field: &str) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::invalid_field(index, field, "must be a string"))
}

fn as_f64(value: &Value, index: usize, field: &str) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| Error::invalid_field(index, field, "must be a number"))
}

fn as_u32(value: &Value, index: usize, field: &str) -> Result<u32> {
    let number = value
        .as_u64()
        .ok_or_else(|| Error::invalid_field(index, field, "must be a non-negative integer"))?;

    u32::try_from(number)
        .map_err(|_| Error::invalid_field(index, field, "exceeds the supported range"))
}
