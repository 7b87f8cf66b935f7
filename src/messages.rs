use std::fmt;

use crate::error::PlugdexError;
use crate::model::PluginRecord;

/// Correlates a store response with the call that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreOp {
    Load,
    Save(PluginRecord),
    Delete(u64),
}

impl StoreOp {
    pub fn kind(&self) -> OpKind {
        match self {
            StoreOp::Load => OpKind::Load,
            StoreOp::Save(_) => OpKind::Save,
            StoreOp::Delete(_) => OpKind::Delete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Load,
    Save,
    Delete,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OpKind::Load => write!(f, "load"),
            OpKind::Save => write!(f, "save"),
            OpKind::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreCommand {
    pub request: RequestId,
    pub op: StoreOp,
}

#[derive(Debug, Clone)]
pub enum StoreUpdate {
    /// The store's whole collection after `op`. `version` grows by one per
    /// successful call.
    Collection {
        request: RequestId,
        op: OpKind,
        version: u64,
        plugins: Vec<PluginRecord>,
    },
    Failed {
        request: RequestId,
        op: OpKind,
        error: PlugdexError,
    },
}

impl StoreUpdate {
    pub fn request(&self) -> RequestId {
        match self {
            StoreUpdate::Collection { request, .. } | StoreUpdate::Failed { request, .. } => {
                *request
            }
        }
    }
}
