use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_master_tables::Migration),
            Box::new(m20240101_000002_create_order_tables::Migration),
            Box::new(m20240101_000003_create_stock_tables::Migration),
            Box::new(m20240101_000004_create_distribution_tables::Migration),
            Box::new(m20240101_000005_create_activity_logs_table::Migration),
        ]
    }
}

#[derive(DeriveIden)]
enum Pangkalans {
    Table,
    Id,
    Code,
    Name,
    Address,
    Region,
    PicName,
    Phone,
    AlokasiBulanan,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    Name,
    Role,
    PangkalanId,
    IsActive,
    LastLoginAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Consumers {
    Table,
    Id,
    PangkalanId,
    Name,
    Nik,
    ConsumerType,
    Phone,
    Address,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LpgProducts {
    Table,
    Id,
    Name,
    LpgType,
    SellingPrice,
    CostPrice,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    OrderNumber,
    PangkalanId,
    Status,
    OrderDate,
    TotalAmount,
    Notes,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OrderItems {
    Table,
    Id,
    OrderId,
    LpgType,
    Quantity,
    UnitPrice,
    Subtotal,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PaymentRecords {
    Table,
    Id,
    OrderId,
    TotalAmount,
    AmountPaid,
    Status,
    LastPaymentAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Invoices {
    Table,
    Id,
    InvoiceNumber,
    OrderId,
    PangkalanId,
    SubTotal,
    TaxAmount,
    TotalAmount,
    IssuedAt,
    DueDate,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ConsumerOrders {
    Table,
    Id,
    PangkalanId,
    ConsumerId,
    LpgType,
    Quantity,
    PricePerUnit,
    TotalAmount,
    SaleDate,
    Note,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StockHistories {
    Table,
    Id,
    ProductId,
    MovementType,
    Quantity,
    Note,
    OrderId,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PenyaluranHarian {
    Table,
    Id,
    PangkalanId,
    Tanggal,
    LpgType,
    Jumlah,
    Kondisi,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PerencanaanHarian {
    Table,
    Id,
    PangkalanId,
    Tanggal,
    LpgType,
    Jumlah,
    Kondisi,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ActivityLogs {
    Table,
    Id,
    ActivityType,
    Title,
    Description,
    UserId,
    PangkalanId,
    OrderId,
    CreatedAt,
}

fn money<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .decimal_len(15, 2)
        .not_null()
        .default(0)
        .to_owned()
}

fn enum_string<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).string_len(32).not_null().to_owned()
}

fn timestamps<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

mod m20240101_000001_create_master_tables {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_master_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Pangkalans::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Pangkalans::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Pangkalans::Code).string_len(32).not_null())
                        .col(ColumnDef::new(Pangkalans::Name).string().not_null())
                        .col(ColumnDef::new(Pangkalans::Address).string().not_null())
                        .col(ColumnDef::new(Pangkalans::Region).string().not_null())
                        .col(ColumnDef::new(Pangkalans::PicName).string().null())
                        .col(ColumnDef::new(Pangkalans::Phone).string().null())
                        .col(
                            ColumnDef::new(Pangkalans::AlokasiBulanan)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Pangkalans::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(timestamps(Pangkalans::CreatedAt))
                        .col(timestamps(Pangkalans::UpdatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_pangkalans_code")
                        .table(Pangkalans::Table)
                        .col(Pangkalans::Code)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Users::Email).string().not_null())
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(enum_string(Users::Role))
                        .col(ColumnDef::new(Users::PangkalanId).uuid().null())
                        .col(
                            ColumnDef::new(Users::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Users::LastLoginAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(timestamps(Users::CreatedAt))
                        .col(timestamps(Users::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_users_pangkalan_id")
                                .from(Users::Table, Users::PangkalanId)
                                .to(Pangkalans::Table, Pangkalans::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_users_email")
                        .table(Users::Table)
                        .col(Users::Email)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Consumers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Consumers::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Consumers::PangkalanId).uuid().not_null())
                        .col(ColumnDef::new(Consumers::Name).string().not_null())
                        .col(ColumnDef::new(Consumers::Nik).string_len(32).null())
                        .col(enum_string(Consumers::ConsumerType))
                        .col(ColumnDef::new(Consumers::Phone).string().null())
                        .col(ColumnDef::new(Consumers::Address).string().null())
                        .col(
                            ColumnDef::new(Consumers::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(timestamps(Consumers::CreatedAt))
                        .col(timestamps(Consumers::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_consumers_pangkalan_id")
                                .from(Consumers::Table, Consumers::PangkalanId)
                                .to(Pangkalans::Table, Pangkalans::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_consumers_pangkalan_id")
                        .table(Consumers::Table)
                        .col(Consumers::PangkalanId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(LpgProducts::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(LpgProducts::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(LpgProducts::Name).string().not_null())
                        .col(enum_string(LpgProducts::LpgType))
                        .col(money(LpgProducts::SellingPrice))
                        .col(money(LpgProducts::CostPrice))
                        .col(
                            ColumnDef::new(LpgProducts::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(timestamps(LpgProducts::CreatedAt))
                        .col(timestamps(LpgProducts::UpdatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_lpg_products_lpg_type")
                        .table(LpgProducts::Table)
                        .col(LpgProducts::LpgType)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(LpgProducts::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Consumers::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Pangkalans::Table).to_owned())
                .await
        }
    }
}

mod m20240101_000002_create_order_tables {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_order_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Orders::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Orders::OrderNumber).string_len(32).not_null())
                        .col(ColumnDef::new(Orders::PangkalanId).uuid().not_null())
                        .col(enum_string(Orders::Status))
                        .col(timestamps(Orders::OrderDate))
                        .col(money(Orders::TotalAmount))
                        .col(ColumnDef::new(Orders::Notes).string().null())
                        .col(ColumnDef::new(Orders::CreatedBy).uuid().null())
                        .col(timestamps(Orders::CreatedAt))
                        .col(timestamps(Orders::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_pangkalan_id")
                                .from(Orders::Table, Orders::PangkalanId)
                                .to(Pangkalans::Table, Pangkalans::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_orders_order_number")
                        .table(Orders::Table)
                        .col(Orders::OrderNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_pangkalan_id")
                        .table(Orders::Table)
                        .col(Orders::PangkalanId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_status")
                        .table(Orders::Table)
                        .col(Orders::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OrderItems::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(OrderItems::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(OrderItems::OrderId).uuid().not_null())
                        .col(enum_string(OrderItems::LpgType))
                        .col(ColumnDef::new(OrderItems::Quantity).integer().not_null())
                        .col(money(OrderItems::UnitPrice))
                        .col(money(OrderItems::Subtotal))
                        .col(timestamps(OrderItems::CreatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_items_order_id")
                                .from(OrderItems::Table, OrderItems::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_items_order_id")
                        .table(OrderItems::Table)
                        .col(OrderItems::OrderId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PaymentRecords::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PaymentRecords::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PaymentRecords::OrderId).uuid().not_null())
                        .col(money(PaymentRecords::TotalAmount))
                        .col(money(PaymentRecords::AmountPaid))
                        .col(enum_string(PaymentRecords::Status))
                        .col(
                            ColumnDef::new(PaymentRecords::LastPaymentAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(timestamps(PaymentRecords::CreatedAt))
                        .col(timestamps(PaymentRecords::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_payment_records_order_id")
                                .from(PaymentRecords::Table, PaymentRecords::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_payment_records_order_id")
                        .table(PaymentRecords::Table)
                        .col(PaymentRecords::OrderId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Invoices::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Invoices::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Invoices::InvoiceNumber)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Invoices::OrderId).uuid().not_null())
                        .col(ColumnDef::new(Invoices::PangkalanId).uuid().not_null())
                        .col(money(Invoices::SubTotal))
                        .col(money(Invoices::TaxAmount))
                        .col(money(Invoices::TotalAmount))
                        .col(timestamps(Invoices::IssuedAt))
                        .col(ColumnDef::new(Invoices::DueDate).date().not_null())
                        .col(enum_string(Invoices::Status))
                        .col(timestamps(Invoices::CreatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoices_order_id")
                                .from(Invoices::Table, Invoices::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_invoices_order_id")
                        .table(Invoices::Table)
                        .col(Invoices::OrderId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_invoices_invoice_number")
                        .table(Invoices::Table)
                        .col(Invoices::InvoiceNumber)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Invoices::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PaymentRecords::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(OrderItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }
}

mod m20240101_000003_create_stock_tables {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_stock_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StockHistories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockHistories::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockHistories::ProductId).uuid().not_null())
                        .col(enum_string(StockHistories::MovementType))
                        .col(ColumnDef::new(StockHistories::Quantity).integer().not_null())
                        .col(ColumnDef::new(StockHistories::Note).string().null())
                        .col(ColumnDef::new(StockHistories::OrderId).uuid().null())
                        .col(ColumnDef::new(StockHistories::CreatedBy).uuid().null())
                        .col(timestamps(StockHistories::CreatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_histories_product_id")
                                .from(StockHistories::Table, StockHistories::ProductId)
                                .to(LpgProducts::Table, LpgProducts::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_histories_product_created")
                        .table(StockHistories::Table)
                        .col(StockHistories::ProductId)
                        .col(StockHistories::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockHistories::Table).to_owned())
                .await
        }
    }
}

mod m20240101_000004_create_distribution_tables {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_distribution_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PenyaluranHarian::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PenyaluranHarian::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PenyaluranHarian::PangkalanId).uuid().not_null())
                        .col(ColumnDef::new(PenyaluranHarian::Tanggal).date().not_null())
                        .col(enum_string(PenyaluranHarian::LpgType))
                        .col(
                            ColumnDef::new(PenyaluranHarian::Jumlah)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(enum_string(PenyaluranHarian::Kondisi))
                        .col(timestamps(PenyaluranHarian::CreatedAt))
                        .col(timestamps(PenyaluranHarian::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_penyaluran_harian_pangkalan_id")
                                .from(PenyaluranHarian::Table, PenyaluranHarian::PangkalanId)
                                .to(Pangkalans::Table, Pangkalans::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_penyaluran_harian_pangkalan_tanggal_type")
                        .table(PenyaluranHarian::Table)
                        .col(PenyaluranHarian::PangkalanId)
                        .col(PenyaluranHarian::Tanggal)
                        .col(PenyaluranHarian::LpgType)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PerencanaanHarian::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PerencanaanHarian::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PerencanaanHarian::PangkalanId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PerencanaanHarian::Tanggal).date().not_null())
                        .col(enum_string(PerencanaanHarian::LpgType))
                        .col(
                            ColumnDef::new(PerencanaanHarian::Jumlah)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(enum_string(PerencanaanHarian::Kondisi))
                        .col(timestamps(PerencanaanHarian::CreatedAt))
                        .col(timestamps(PerencanaanHarian::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_perencanaan_harian_pangkalan_id")
                                .from(PerencanaanHarian::Table, PerencanaanHarian::PangkalanId)
                                .to(Pangkalans::Table, Pangkalans::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_perencanaan_harian_pangkalan_tanggal_type")
                        .table(PerencanaanHarian::Table)
                        .col(PerencanaanHarian::PangkalanId)
                        .col(PerencanaanHarian::Tanggal)
                        .col(PerencanaanHarian::LpgType)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PerencanaanHarian::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PenyaluranHarian::Table).to_owned())
                .await
        }
    }
}

mod m20240101_000005_create_activity_logs_table {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_activity_logs_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // No foreign keys: log rows outlive the records they mention.
            manager
                .create_table(
                    Table::create()
                        .table(ActivityLogs::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(ActivityLogs::Id).uuid().primary_key().not_null())
                        .col(enum_string(ActivityLogs::ActivityType))
                        .col(ColumnDef::new(ActivityLogs::Title).string().not_null())
                        .col(ColumnDef::new(ActivityLogs::Description).string().not_null())
                        .col(ColumnDef::new(ActivityLogs::UserId).uuid().null())
                        .col(ColumnDef::new(ActivityLogs::PangkalanId).uuid().null())
                        .col(ColumnDef::new(ActivityLogs::OrderId).uuid().null())
                        .col(timestamps(ActivityLogs::CreatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_activity_logs_created_at")
                        .table(ActivityLogs::Table)
                        .col(ActivityLogs::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ActivityLogs::Table).to_owned())
                .await
        }
    }
}
