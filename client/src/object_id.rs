//! # Object References
//!
//! Every on-chain entity is addressed by a `space.type.instance` triple such
//! as `1.2.17` (account seventeen) or `1.3.0` (the core asset). The triple is
//! the only client-side type safety over what is otherwise a bare integer
//! reference, so parsing validates the declared category whenever the caller
//! knows what kind of object a field must hold.
//!
//! Wire form is the varint-encoded instance number alone — space and type are
//! implied by the field's position in its parent structure. JSON form is the
//! full dotted string.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::codec::{read_varint, write_varint, CodecError, Decode, Encode};

/// Space number for protocol objects (accounts, assets, operations…).
pub const PROTOCOL_SPACE: u8 = 1;

/// Space number for implementation objects (dynamic properties, indexes…).
pub const IMPLEMENTATION_SPACE: u8 = 2;

/// Errors raised when parsing or validating an object reference.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ObjectIdError {
    /// The string is not three dot-separated non-negative integers.
    #[error("invalid object id: {0:?}")]
    InvalidObjectId(String),

    /// The id parsed, but its type component is not the expected category.
    #[error("object id {id} is not a {expected:?} (type {found}, wanted {wanted})")]
    ObjectTypeMismatch {
        id: String,
        expected: ObjectType,
        found: u8,
        wanted: u8,
    },
}

/// Protocol-space object categories and their numeric type ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Base,
    Account,
    Asset,
    ForceSettlement,
    CommitteeMember,
    Witness,
    LimitOrder,
    CallOrder,
    Proposal,
    WithdrawPermission,
    VestingBalance,
    Worker,
    Balance,
    Contract,
    File,
    Crontab,
    WorldView,
    NhAsset,
    NhAssetOrder,
}

impl ObjectType {
    /// The numeric type id used in the dotted string form.
    pub fn type_id(self) -> u8 {
        match self {
            ObjectType::Base => 1,
            ObjectType::Account => 2,
            ObjectType::Asset => 3,
            ObjectType::ForceSettlement => 4,
            ObjectType::CommitteeMember => 5,
            ObjectType::Witness => 6,
            ObjectType::LimitOrder => 7,
            ObjectType::CallOrder => 8,
            ObjectType::Proposal => 10,
            ObjectType::WithdrawPermission => 11,
            ObjectType::VestingBalance => 13,
            ObjectType::Worker => 14,
            ObjectType::Balance => 15,
            ObjectType::Contract => 16,
            ObjectType::File => 17,
            ObjectType::Crontab => 18,
            ObjectType::WorldView => 19,
            ObjectType::NhAsset => 20,
            ObjectType::NhAssetOrder => 21,
        }
    }
}

/// A parsed `space.type.instance` reference. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    pub space: u8,
    pub ty: u8,
    pub instance: u64,
}

impl ObjectId {
    /// Build an id from its raw components. No category check — use
    /// [`ObjectId::parse`] when validating caller input.
    pub fn new(space: u8, ty: u8, instance: u64) -> Self {
        ObjectId { space, ty, instance }
    }

    /// Reference to a protocol object of a known category.
    pub fn protocol(ty: ObjectType, instance: u64) -> Self {
        ObjectId::new(PROTOCOL_SPACE, ty.type_id(), instance)
    }

    /// Parse a dotted id string, optionally enforcing the object category.
    ///
    /// `parse("1.3.0", Some(ObjectType::Asset))` succeeds; the same string
    /// against `Account` is an [`ObjectIdError::ObjectTypeMismatch`]; a
    /// two-component string is [`ObjectIdError::InvalidObjectId`].
    pub fn parse(s: &str, expected: Option<ObjectType>) -> Result<Self, ObjectIdError> {
        let invalid = || ObjectIdError::InvalidObjectId(s.to_string());
        let mut parts = s.split('.');
        let space: u8 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        let ty: u8 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        let instance: u64 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        if let Some(category) = expected {
            if ty != category.type_id() {
                return Err(ObjectIdError::ObjectTypeMismatch {
                    id: s.to_string(),
                    expected: category,
                    found: ty,
                    wanted: category.type_id(),
                });
            }
        }
        Ok(ObjectId { space, ty, instance })
    }

    /// True when this id references the given protocol category.
    pub fn is_a(&self, category: ObjectType) -> bool {
        self.space == PROTOCOL_SPACE && self.ty == category.type_id()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.space, self.ty, self.instance)
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse(s, None)
    }
}

// Wire form is the instance alone; space/type ride on field position.
impl Encode for ObjectId {
    fn encode(&self, out: &mut Vec<u8>) {
        write_varint(self.instance, out);
    }
}

impl Decode for ObjectId {
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        // Space and type are not on the wire; the caller re-attaches them.
        let instance = read_varint(input)?;
        Ok(ObjectId::new(0, 0, instance))
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
