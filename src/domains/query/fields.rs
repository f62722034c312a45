//! Per-entity field metadata.
//!
//! Static tables of the fields QuickBooks Online accepts in WHERE and
//! ORDER BY clauses for each supported entity, along with the primitive
//! type each field expects. Validation and value coercion both read from
//! here. The tables cover the queryable subset of each entity, not the
//! full response payload, and never contain reserved directive keywords.

/// Primitive type a field's filter values are coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    /// ISO-8601 date or datetime, carried as an opaque string and never
    /// parsed locally.
    Date,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
        };
        f.write_str(name)
    }
}

/// Metadata for a single queryable field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldType,
    pub filterable: bool,
    pub sortable: bool,
}

const fn field(name: &'static str, kind: FieldType, filterable: bool, sortable: bool) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        filterable,
        sortable,
    }
}

const STR: FieldType = FieldType::String;
const NUM: FieldType = FieldType::Number;
const BOOL: FieldType = FieldType::Boolean;
const DATE: FieldType = FieldType::Date;

const CUSTOMER_FIELDS: &[FieldSpec] = &[
    field("Id", STR, true, true),
    field("DisplayName", STR, true, true),
    field("GivenName", STR, true, true),
    field("MiddleName", STR, true, false),
    field("FamilyName", STR, true, true),
    field("CompanyName", STR, true, true),
    field("FullyQualifiedName", STR, true, false),
    field("PrintOnCheckName", STR, true, false),
    field("PrimaryEmailAddr", STR, true, false),
    field("Active", BOOL, true, false),
    field("Balance", NUM, true, true),
    field("BalanceWithJobs", NUM, true, false),
    field("MetaData.CreateTime", DATE, true, true),
    field("MetaData.LastUpdatedTime", DATE, true, true),
];

const VENDOR_FIELDS: &[FieldSpec] = &[
    field("Id", STR, true, true),
    field("DisplayName", STR, true, true),
    field("GivenName", STR, true, false),
    field("FamilyName", STR, true, false),
    field("CompanyName", STR, true, true),
    field("AcctNum", STR, true, false),
    field("Active", BOOL, true, false),
    field("Vendor1099", BOOL, true, false),
    field("Balance", NUM, true, true),
    field("MetaData.CreateTime", DATE, true, true),
    field("MetaData.LastUpdatedTime", DATE, true, true),
];

const INVOICE_FIELDS: &[FieldSpec] = &[
    field("Id", STR, true, true),
    field("DocNumber", STR, true, true),
    field("TxnDate", DATE, true, true),
    field("DueDate", DATE, true, true),
    field("CustomerRef", STR, true, false),
    field("TotalAmt", NUM, true, true),
    field("Balance", NUM, true, true),
    field("PrintStatus", STR, true, false),
    field("EmailStatus", STR, true, false),
    field("MetaData.CreateTime", DATE, true, true),
    field("MetaData.LastUpdatedTime", DATE, true, true),
];

const BILL_FIELDS: &[FieldSpec] = &[
    field("Id", STR, true, true),
    field("DocNumber", STR, true, true),
    field("TxnDate", DATE, true, true),
    field("DueDate", DATE, true, true),
    field("VendorRef", STR, true, false),
    field("TotalAmt", NUM, true, true),
    field("Balance", NUM, true, true),
    field("MetaData.CreateTime", DATE, true, true),
    field("MetaData.LastUpdatedTime", DATE, true, true),
];

const ACCOUNT_FIELDS: &[FieldSpec] = &[
    field("Id", STR, true, true),
    field("Name", STR, true, true),
    field("FullyQualifiedName", STR, true, false),
    field("AccountType", STR, true, true),
    field("AccountSubType", STR, true, false),
    field("Classification", STR, true, false),
    field("AcctNum", STR, true, false),
    field("Active", BOOL, true, false),
    field("CurrentBalance", NUM, true, true),
    field("MetaData.CreateTime", DATE, true, true),
    field("MetaData.LastUpdatedTime", DATE, true, true),
];

const ITEM_FIELDS: &[FieldSpec] = &[
    field("Id", STR, true, true),
    field("Name", STR, true, true),
    field("Sku", STR, true, false),
    field("Type", STR, true, true),
    field("Active", BOOL, true, false),
    field("Taxable", BOOL, true, false),
    field("UnitPrice", NUM, true, true),
    field("PurchaseCost", NUM, true, false),
    field("MetaData.CreateTime", DATE, true, true),
    field("MetaData.LastUpdatedTime", DATE, true, true),
];

const PAYMENT_FIELDS: &[FieldSpec] = &[
    field("Id", STR, true, true),
    field("TxnDate", DATE, true, true),
    field("CustomerRef", STR, true, false),
    field("PaymentRefNum", STR, true, true),
    field("TotalAmt", NUM, true, true),
    field("UnappliedAmt", NUM, true, false),
    field("MetaData.CreateTime", DATE, true, true),
    field("MetaData.LastUpdatedTime", DATE, true, true),
];

const ESTIMATE_FIELDS: &[FieldSpec] = &[
    field("Id", STR, true, true),
    field("DocNumber", STR, true, true),
    field("TxnDate", DATE, true, true),
    field("ExpirationDate", DATE, true, true),
    field("CustomerRef", STR, true, false),
    field("TxnStatus", STR, true, false),
    field("TotalAmt", NUM, true, true),
    field("MetaData.CreateTime", DATE, true, true),
    field("MetaData.LastUpdatedTime", DATE, true, true),
];

const EMPLOYEE_FIELDS: &[FieldSpec] = &[
    field("Id", STR, true, true),
    field("DisplayName", STR, true, true),
    field("GivenName", STR, true, true),
    field("FamilyName", STR, true, true),
    field("EmployeeNumber", STR, true, false),
    field("Active", BOOL, true, false),
    field("HiredDate", DATE, true, true),
    field("ReleasedDate", DATE, true, false),
    field("MetaData.CreateTime", DATE, true, true),
    field("MetaData.LastUpdatedTime", DATE, true, true),
];

const PURCHASE_FIELDS: &[FieldSpec] = &[
    field("Id", STR, true, true),
    field("DocNumber", STR, true, true),
    field("TxnDate", DATE, true, true),
    field("PaymentType", STR, true, false),
    field("EntityRef", STR, true, false),
    field("AccountRef", STR, true, false),
    field("TotalAmt", NUM, true, true),
    field("Credit", BOOL, true, false),
    field("MetaData.CreateTime", DATE, true, true),
    field("MetaData.LastUpdatedTime", DATE, true, true),
];

const CREDIT_MEMO_FIELDS: &[FieldSpec] = &[
    field("Id", STR, true, true),
    field("DocNumber", STR, true, true),
    field("TxnDate", DATE, true, true),
    field("CustomerRef", STR, true, false),
    field("TotalAmt", NUM, true, true),
    field("Balance", NUM, true, true),
    field("RemainingCredit", NUM, true, false),
    field("MetaData.CreateTime", DATE, true, true),
    field("MetaData.LastUpdatedTime", DATE, true, true),
];

/// Entities with registered field metadata, alphabetical.
pub fn known_entities() -> &'static [&'static str] {
    &[
        "Account",
        "Bill",
        "CreditMemo",
        "Customer",
        "Employee",
        "Estimate",
        "Invoice",
        "Item",
        "Payment",
        "Purchase",
        "Vendor",
    ]
}

/// Field table for an entity, if one is registered.
pub fn entity_fields(entity: &str) -> Option<&'static [FieldSpec]> {
    match entity {
        "Account" => Some(ACCOUNT_FIELDS),
        "Bill" => Some(BILL_FIELDS),
        "CreditMemo" => Some(CREDIT_MEMO_FIELDS),
        "Customer" => Some(CUSTOMER_FIELDS),
        "Employee" => Some(EMPLOYEE_FIELDS),
        "Estimate" => Some(ESTIMATE_FIELDS),
        "Invoice" => Some(INVOICE_FIELDS),
        "Item" => Some(ITEM_FIELDS),
        "Payment" => Some(PAYMENT_FIELDS),
        "Purchase" => Some(PURCHASE_FIELDS),
        "Vendor" => Some(VENDOR_FIELDS),
        _ => None,
    }
}

/// Metadata for one field of an entity.
pub fn field_spec(entity: &str, field: &str) -> Option<&'static FieldSpec> {
    entity_fields(entity)?.iter().find(|spec| spec.name == field)
}

/// Names a caller may filter by, for validation messages.
pub fn filterable_fields(entity: &str) -> Vec<&'static str> {
    entity_fields(entity)
        .map(|fields| {
            fields
                .iter()
                .filter(|spec| spec.filterable)
                .map(|spec| spec.name)
                .collect()
        })
        .unwrap_or_default()
}

/// Names a caller may sort by, for validation messages.
pub fn sortable_fields(entity: &str) -> Vec<&'static str> {
    entity_fields(entity)
        .map(|fields| {
            fields
                .iter()
                .filter(|spec| spec.sortable)
                .map(|spec| spec.name)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::query::criteria::is_reserved;

    #[test]
    fn test_every_known_entity_has_a_table() {
        for entity in known_entities() {
            let fields = entity_fields(entity).unwrap();
            assert!(!fields.is_empty(), "{entity} has an empty field table");
        }
    }

    #[test]
    fn test_unknown_entity_has_no_table() {
        assert!(entity_fields("TimeActivity").is_none());
        assert!(entity_fields("customer").is_none());
        assert!(field_spec("TimeActivity", "Id").is_none());
        assert!(filterable_fields("TimeActivity").is_empty());
    }

    #[test]
    fn test_no_table_uses_reserved_keywords() {
        for entity in known_entities() {
            for spec in entity_fields(entity).unwrap() {
                assert!(
                    !is_reserved(spec.name),
                    "{entity}.{} collides with a directive keyword",
                    spec.name
                );
            }
        }
    }

    #[test]
    fn test_every_entity_has_id_and_audit_timestamps() {
        for entity in known_entities() {
            for required in ["Id", "MetaData.CreateTime", "MetaData.LastUpdatedTime"] {
                assert!(
                    field_spec(entity, required).is_some(),
                    "{entity} is missing {required}"
                );
            }
        }
    }

    #[test]
    fn test_field_lookup_is_exact() {
        let spec = field_spec("Customer", "Balance").unwrap();
        assert_eq!(spec.kind, FieldType::Number);
        assert!(spec.sortable);
        assert!(field_spec("Customer", "balance").is_none());
    }

    #[test]
    fn test_sortable_is_subset_of_table() {
        for entity in known_entities() {
            for name in sortable_fields(entity) {
                assert!(field_spec(entity, name).is_some());
            }
        }
    }
}
