pub mod customer;
pub mod invoice;
pub mod invoice_line;
pub mod location;
pub mod payment;
pub mod product;
pub mod stock_item;
pub mod stock_ledger;
pub mod transfer;
pub mod transfer_line;
pub mod vendor;
