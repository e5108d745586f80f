// Master data
pub mod consumers;
pub mod lpg_products;
pub mod pangkalans;
pub mod users;

// Stock and sales
pub mod consumer_orders;
pub mod orders;
pub mod stock;

// Financial services
pub mod money;
pub mod invoicing;
pub mod payments;

// Daily distribution and its monthly aggregation
pub mod distribution;
pub mod rekapitulasi;

// Reporting and notifications
pub mod activity;
pub mod notifications;
pub mod reports;
