//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod dataset;
pub mod gate_pass;
pub mod inventory_item;
pub mod issuance_record;
pub mod issuance_requisition;
pub mod notification;
pub mod quantity_update;
pub mod requisition;
pub mod session;
pub mod spare_part;
pub mod user;

// Re-export specific types to avoid conflicts
pub use dataset::{Column as DatasetColumn, Entity as Dataset, Model as DatasetModel};
pub use gate_pass::{Column as GatePassColumn, Entity as GatePass, Model as GatePassModel};
pub use inventory_item::{
    Column as InventoryItemColumn, Entity as InventoryItem, Model as InventoryItemModel,
};
pub use issuance_record::{
    Column as IssuanceRecordColumn, Entity as IssuanceRecord, Model as IssuanceRecordModel,
};
pub use issuance_requisition::{
    Column as IssuanceRequisitionColumn, Entity as IssuanceRequisition,
    Model as IssuanceRequisitionModel,
};
pub use notification::{
    Column as NotificationColumn, Entity as Notification, Model as NotificationModel,
};
pub use quantity_update::{
    Column as QuantityUpdateColumn, Entity as QuantityUpdate, Model as QuantityUpdateModel,
};
pub use requisition::{
    Column as RequisitionColumn, Entity as Requisition, Model as RequisitionModel,
};
pub use session::{Column as SessionColumn, Entity as Session, Model as SessionModel};
pub use spare_part::{Column as SparePartColumn, Entity as SparePart, Model as SparePartModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
