pub mod pagination;
pub mod response;
pub mod string_enum;

pub use pagination::{
    PaginatedResponse, PaginationInfo, PaginationQuery, deserialize_option_bool,
    deserialize_option_i64,
};
pub use response::ApiResponse;
