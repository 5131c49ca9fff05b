pub mod credential;
pub mod lesson;
pub mod provisioning;
pub mod user;

pub use lesson::{Asset, Lesson, LessonWithAssets, NewLesson};
pub use provisioning::{NewInvite, PendingInvite, PendingPasswordReset};
pub use user::{NewUser, Role, User};
