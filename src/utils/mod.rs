pub mod cookie;
pub mod jwt;
pub mod markdown;
pub mod password;
pub mod problem_code;

pub use jwt::{decode_token, encode_token};
pub use markdown::render_markdown;
pub use password::{hash_password, verify_password};
pub use problem_code::sort_problem_codes;
