use thiserror::Error;

use crate::kv::KVError;

#[derive(Error, Debug)]
pub enum TrackerError {
  #[error(transparent)]
  Storage(#[from] KVError),

  #[error("no set '{0}' in the catalog")]
  UnknownSet(String),

  #[error("set '{set_num}' is not in the {list}")]
  NotInList { set_num: String, list: &'static str },

  #[error(transparent)]
  Json(#[from] serde_json::Error),

  #[error("invalid configuration: {0}")]
  Config(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
