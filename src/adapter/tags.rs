//! Reserved log tags, one per adapter call site.
//!
//! Values are stable: dashboards and alerts search for them.

use crate::telemetry::Tag;

pub const GET_CLIENT: Tag = Tag(0x2f41_0a01);

pub const CREATE_DATABASE: Tag = Tag(0x2f41_0a02);
pub const READ_DATABASE: Tag = Tag(0x2f41_0a03);
pub const DELETE_DATABASE: Tag = Tag(0x2f41_0a04);

pub const CREATE_COLLECTION: Tag = Tag(0x2f41_0a05);
pub const READ_COLLECTION: Tag = Tag(0x2f41_0a06);
pub const DELETE_COLLECTION: Tag = Tag(0x2f41_0a07);

pub const CREATE_DOCUMENT: Tag = Tag(0x2f41_0a08);
pub const READ_DOCUMENT: Tag = Tag(0x2f41_0a09);
pub const REPLACE_DOCUMENT: Tag = Tag(0x2f41_0a0a);
pub const UPSERT_DOCUMENT: Tag = Tag(0x2f41_0a0b);
pub const DELETE_DOCUMENT: Tag = Tag(0x2f41_0a0c);
pub const QUERY_DOCUMENTS: Tag = Tag(0x2f41_0a0d);
