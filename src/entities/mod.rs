pub mod activity_log;
pub mod consumer;
pub mod consumer_order;
pub mod enums;
pub mod invoice;
pub mod lpg_product;
pub mod order;
pub mod order_item;
pub mod pangkalan;
pub mod payment_record;
pub mod penyaluran_harian;
pub mod perencanaan_harian;
pub mod stock_history;
pub mod user;

pub use enums::{
    ActivityType, ConsumerType, InvoiceStatus, Kondisi, LpgType, MovementType, OrderStatus,
    PaymentStatus, UserRole,
};
