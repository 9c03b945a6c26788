//! Entity types returned by the landlord API.

use crate::sort::{FieldValue, Sortable};
use crate::RecordId;
use serde::{Deserialize, Deserializer, Serialize};

/// Anything addressable by the upstream integer id.
pub trait HasRecordId {
    fn record_id(&self) -> RecordId;
}

// ============================================================================
// LANDLORD
// ============================================================================

/// A landlord with the properties they own and a count of their messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Landlord {
    pub landlord_id: RecordId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone_1: String,
    #[serde(default)]
    pub messages_count: i64,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl Landlord {
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

impl HasRecordId for Landlord {
    fn record_id(&self) -> RecordId {
        self.landlord_id
    }
}

/// Listing columns a landlord page can be sorted by.
///
/// Email and phone are displayed but not sortable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandlordColumn {
    Id,
    Name,
    PropertiesCount,
    MessagesCount,
}

impl LandlordColumn {
    pub fn all() -> &'static [LandlordColumn] {
        &[
            LandlordColumn::Id,
            LandlordColumn::Name,
            LandlordColumn::PropertiesCount,
            LandlordColumn::MessagesCount,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            LandlordColumn::Id => "ID",
            LandlordColumn::Name => "Name",
            LandlordColumn::PropertiesCount => "Properties",
            LandlordColumn::MessagesCount => "Messages",
        }
    }

    pub fn from_index(index: usize) -> Option<LandlordColumn> {
        Self::all().get(index).copied()
    }
}

impl Sortable for Landlord {
    type Column = LandlordColumn;

    fn sort_value(&self, column: LandlordColumn) -> FieldValue<'_> {
        match column {
            LandlordColumn::Id => FieldValue::Number(self.landlord_id),
            LandlordColumn::Name => FieldValue::Text(&self.full_name),
            LandlordColumn::PropertiesCount => FieldValue::Number(self.properties.len() as i64),
            LandlordColumn::MessagesCount => FieldValue::Number(self.messages_count),
        }
    }
}

// ============================================================================
// PROPERTY
// ============================================================================

/// A property unit owned by a landlord.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub property_id: RecordId,
    #[serde(default)]
    pub p_number: Option<i64>,
    #[serde(default)]
    pub no_room: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub property_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub unit_no: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub area: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub building_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub project: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub state: String,
}

// ============================================================================
// MESSAGE
// ============================================================================

/// A message exchanged with a landlord.
///
/// The timestamp is kept as sent by the server; formatting is a display
/// concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: RecordId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub timestamp: String,
    pub landlord: RecordId,
}

/// Envelope of the message listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageList {
    pub results: Vec<Message>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
