mod billing_record;

pub use billing_record::BillingRecord;
