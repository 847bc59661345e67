//! 类型定义模块

mod order;
mod record;
mod zone;

pub use order::{Order, OrderConfig};
pub use record::{NewRecord, Record, RecordRequest, RecordView};
pub use zone::{NewZone, Zone, ZoneApiView, ZoneEvent, ZoneStatus};

// Re-export provider 库的公共类型
pub use servicedns_provider::{
    MxPriorityStyle, ProviderConfig, ProviderMetadata, ProviderType, RecordType,
};
