//! Local exec command envelope
//!
//! The node expects `{hash, sigs, cmd}` where `cmd` is the command JSON as a
//! string and `hash` is the unpadded base64url Blake2b-256 of that string.

use super::QueryMetadata;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use blake2::{digest::consts::U32, Blake2b, Digest};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

type Blake2b256 = Blake2b<U32>;

/// Signed-command envelope posted to the local endpoint
#[derive(Debug, Clone, Serialize)]
pub struct LocalCommand {
    pub hash: String,
    pub sigs: Vec<Value>,
    pub cmd: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CommandBody<'a> {
    network_id: Option<&'a str>,
    payload: Payload<'a>,
    signers: Vec<Value>,
    meta: &'a QueryMetadata,
    nonce: String,
}

#[derive(Serialize)]
struct Payload<'a> {
    exec: Exec<'a>,
}

#[derive(Serialize)]
struct Exec<'a> {
    data: Map<String, Value>,
    code: &'a str,
}

impl LocalCommand {
    /// Unsigned exec command for `code` with the given metadata
    pub fn exec(code: &str, meta: &QueryMetadata) -> Result<Self, serde_json::Error> {
        let body = CommandBody {
            network_id: None,
            payload: Payload {
                exec: Exec {
                    data: Map::new(),
                    code,
                },
            },
            signers: Vec::new(),
            meta,
            nonce: Uuid::new_v4().to_string(),
        };

        let cmd = serde_json::to_string(&body)?;

        Ok(Self {
            hash: hash_command(&cmd),
            sigs: Vec::new(),
            cmd,
        })
    }
}

/// Command hash as the node computes it
pub fn hash_command(cmd: &str) -> String {
    URL_SAFE_NO_PAD.encode(Blake2b256::digest(cmd.as_bytes()))
}
