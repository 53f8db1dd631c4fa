mod billing_dto;

pub use billing_dto::{AssignCategoryDto, BillingRecordDto, ScrapeRequestDto};
