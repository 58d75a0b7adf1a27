#[allow(unused_imports)]
pub mod prelude {
    pub use super::todo::Entity as Todo;
}

pub mod todo {
    use sea_orm::entity::prelude::*;

    /// A single to-do item. `title` is capped at 60 chars and `text` at 191
    /// by convention; the store only enforces that both are non-empty.
    /// `pub_date` is fixed at creation, `update_date` moves on every write.
    #[sea_orm::model]
    #[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
    #[sea_orm(table_name = "todos")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub title: String,
        pub text: String,
        #[sea_orm(default_value = false)]
        pub done: bool,
        pub pub_date: DateTimeWithTimeZone,
        #[sea_orm(indexed, default_expr = "Expr::current_timestamp()")]
        pub update_date: DateTimeWithTimeZone,
    }

    impl ActiveModelBehavior for ActiveModel {}
}
