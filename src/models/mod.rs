pub mod draft;
pub mod reaction;
pub mod solution;
pub mod user;

pub use draft::{Entity as Draft, Model as DraftModel};
pub use reaction::{Entity as Reaction, Model as ReactionModel};
pub use solution::{Entity as Solution, Model as SolutionModel};
pub use user::{Entity as User, Model as UserModel};
