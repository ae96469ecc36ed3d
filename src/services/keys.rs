use crate::models::Classification;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::Serialize;
use std::fmt;
use std::io;

const KEY_ENTROPY_BYTES: usize = 16;

/// Object-store key of the form `{classification}/{32 hex chars}.mp4`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive a fresh key from 128 bits of OS entropy. Caller-supplied names never
/// take part in the key.
pub fn derive_key(classification: Classification) -> io::Result<ObjectKey> {
    let mut bytes = [0u8; KEY_ENTROPY_BYTES];
    OsRng.try_fill_bytes(&mut bytes).map_err(io::Error::other)?;

    Ok(ObjectKey(format!(
        "{}/{}.mp4",
        classification,
        hex::encode(bytes)
    )))
}
