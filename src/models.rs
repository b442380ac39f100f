//! Domain value types shared by the core and API layers.
//!
//! Entities store these as plain strings (see [`crate::entities`]); the enums
//! here give them a closed set of values and a single place for parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Implements `as_str`, `Display` and `FromStr` for a unit-only enum.
macro_rules! string_enum {
    ($name:ident { $($variant:ident => $text:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl $name {
            /// Canonical name as stored in the database
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = crate::errors::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text $(| $alias)* => Ok(Self::$variant),)+
                    other => Err(crate::errors::Error::validation(format!(
                        "unknown {} `{other}`",
                        stringify!($name)
                    ))),
                }
            }
        }
    };
}

/// Kind of stock movement recorded by a requisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequisitionType {
    /// Items leave the store and are expected back
    Issue,
    /// Previously issued items come back
    Return,
    /// Items leave the store for good
    Consume,
}

string_enum!(RequisitionType {
    Issue => "issue",
    Return => "return",
    Consume => "consume",
});

/// Workflow state of a requisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequisitionStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

string_enum!(RequisitionStatus {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
    Completed => "completed",
});

/// Requisition priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

string_enum!(Priority {
    Low => "low",
    Medium => "medium",
    High => "high",
    Urgent => "urgent",
});

/// Gate pass approval state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

string_enum!(ApprovalStatus {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
});

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Requisition,
    Issuance,
    GatePass,
    System,
}

string_enum!(NotificationKind {
    Requisition => "requisition",
    Issuance => "issuance",
    GatePass => "gate_pass",
    System => "system",
});

/// Staff roles, highest privilege first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Dev,
    Admin,
    Manager,
    DeputyManager,
    Engineer,
    AssistantEngineer,
    MasterTechnician,
    Technician,
}

string_enum!(UserRole {
    Dev => "dev",
    Admin => "admin",
    Manager => "manager",
    DeputyManager => "deputy_manager",
    Engineer => "engineer",
    AssistantEngineer => "assistant_engineer",
    MasterTechnician => "master_technician",
    Technician => "technician",
});

impl UserRole {
    /// Whether the role may create, edit and delete user accounts.
    #[must_use]
    pub const fn can_manage_users(self) -> bool {
        matches!(self, Self::Dev | Self::Admin)
    }
}

/// Keys of the schemaless item collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKey {
    #[serde(rename = "inventoryItems")]
    InventoryItems,
    #[serde(rename = "toolsItems")]
    ToolsItems,
    #[serde(rename = "generalToolsItems")]
    GeneralToolsItems,
    #[serde(rename = "ppeItems")]
    PpeItems,
    #[serde(rename = "stationeryItems")]
    StationeryItems,
    #[serde(rename = "faultyReturns")]
    FaultyReturns,
}

impl CollectionKey {
    /// Every collection, in dashboard order.
    pub const ALL: [Self; 6] = [
        Self::InventoryItems,
        Self::ToolsItems,
        Self::GeneralToolsItems,
        Self::PpeItems,
        Self::StationeryItems,
        Self::FaultyReturns,
    ];

    /// Document key as stored in the `datasets` table
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InventoryItems => "inventoryItems",
            Self::ToolsItems => "toolsItems",
            Self::GeneralToolsItems => "generalToolsItems",
            Self::PpeItems => "ppeItems",
            Self::StationeryItems => "stationeryItems",
            Self::FaultyReturns => "faultyReturns",
        }
    }

    /// Item fields that may hold the quantity, in priority order.
    #[must_use]
    pub const fn quantity_keys(self) -> &'static [&'static str] {
        match self {
            Self::ToolsItems | Self::GeneralToolsItems => &["quantity", "qty", "available", "stock"],
            Self::PpeItems => &["quantity", "availableQuantity", "available", "stock"],
            Self::StationeryItems => &["quantity", "available", "stock"],
            Self::InventoryItems => &["current_stock", "quantity", "available", "stock"],
            Self::FaultyReturns => &["quantity"],
        }
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionKey {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| crate::errors::Error::validation(format!("unknown collection `{s}`")))
    }
}

/// Item fields that may hold an item's display name, in priority order.
pub const NAME_KEYS: [&str; 4] = ["name", "itemName", "toolName", "partName"];

/// Stock category a requisition can move items in or out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockCategory {
    SpareParts,
    Inventory,
    Tools,
    GeneralTools,
    Ppe,
    Stationery,
}

string_enum!(StockCategory {
    SpareParts => "spare_parts" | "spare_management" | "spare_part",
    Inventory => "inventory",
    Tools => "tools" | "tool",
    GeneralTools => "general_tools",
    Ppe => "ppe",
    Stationery => "stationery",
});

impl StockCategory {
    /// Collection holding this category's items.
    ///
    /// Spare parts live only in the relational store. Inventory items live in
    /// the relational store first and fall back to the `inventoryItems`
    /// collection.
    #[must_use]
    pub const fn collection(self) -> Option<CollectionKey> {
        match self {
            Self::SpareParts => None,
            Self::Inventory => Some(CollectionKey::InventoryItems),
            Self::Tools => Some(CollectionKey::ToolsItems),
            Self::GeneralTools => Some(CollectionKey::GeneralToolsItems),
            Self::Ppe => Some(CollectionKey::PpeItems),
            Self::Stationery => Some(CollectionKey::StationeryItems),
        }
    }
}

/// How urgently a low-stock item needs reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Critical,
    Warning,
    Low,
}

/// Person receiving items on a gate pass or issuance sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receiver {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Signature, usually a data URL or typed name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub olt_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requisition_type_parse_is_case_insensitive() {
        assert_eq!("Issue".parse::<RequisitionType>().ok(), Some(RequisitionType::Issue));
        assert_eq!(" RETURN ".parse::<RequisitionType>().ok(), Some(RequisitionType::Return));
        assert!("transfer".parse::<RequisitionType>().is_err());
    }

    #[test]
    fn test_stock_category_aliases() {
        assert_eq!(
            "spare_management".parse::<StockCategory>().ok(),
            Some(StockCategory::SpareParts)
        );
        assert_eq!("tool".parse::<StockCategory>().ok(), Some(StockCategory::Tools));
        assert!("faulty_return".parse::<StockCategory>().is_err());
    }

    #[test]
    fn test_collection_key_round_trip_names() {
        for key in CollectionKey::ALL {
            assert_eq!(key.as_str().parse::<CollectionKey>().ok(), Some(key));
        }
        assert!("toolsitems".parse::<CollectionKey>().is_err());
    }

    #[test]
    fn test_only_dev_and_admin_manage_users() {
        assert!(UserRole::Dev.can_manage_users());
        assert!(UserRole::Admin.can_manage_users());
        assert!(!UserRole::Manager.can_manage_users());
        assert!(!UserRole::Technician.can_manage_users());
    }
}
