//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod common;
pub mod entity;
pub mod search;

pub use entity::{
    EntityCreateTool, EntityDeleteTool, EntityGetTool, EntityUpdateTool, RawQueryTool,
};
pub use search::{
    AccountSearchTool, BillSearchTool, CreditMemoSearchTool, CustomerSearchTool,
    EmployeeSearchTool, EstimateSearchTool, InvoiceSearchTool, ItemSearchTool, PaymentSearchTool,
    PurchaseSearchTool, SearchParams, VendorSearchTool,
};
