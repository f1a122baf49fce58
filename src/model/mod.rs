mod author;
mod chapter;
mod cover;
mod group;
mod manga;
mod static_data;
mod tag;
mod user;

pub use author::AuthorAttributes;
pub use chapter::{Chapter, ChapterAttributes};
pub use cover::{Cover, CoverAttributes, UPLOADS_URL};
pub use group::{ScanlationGroup, ScanlationGroupAttributes};
pub use manga::{Manga, MangaAttributes};
pub use static_data::*;
pub use tag::{Tag, TagAttributes};
pub use user::{User, UserAttributes};
