//! Accessor parameters and their serialization into query options.
//!
//! Each struct carries the documented defaults of its endpoint. Enum-typed
//! fields are closed types from [`director_core::types`], so a struct that
//! exists is already valid; string input is validated when it is parsed into
//! those types.

use director_core::query::{cache_buster, IdList, QueryOptions, TagList};
use director_core::types::{
    optional_scope, ContentSort, GalleryOrder, Scope, SortDirection, UserSort,
};
use serde::{Deserialize, Serialize};

/// Returns the scope pair when both halves are usable; otherwise the filter is
/// dropped without error.
fn scope_pair(scope: Option<Scope>, scope_id: Option<u64>) -> Option<(Scope, u64)> {
    match (scope, scope_id) {
        (Some(scope), Some(id)) if id != 0 => Some((scope, id)),
        _ => None,
    }
}

/// Parameters for `get_gallery`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryParams {
    /// Number of member albums to return; 0 returns all.
    pub limit: u32,
    /// Album order override.
    pub order: GalleryOrder,
    /// Whether to include each album's content.
    pub with_content: bool,
}

impl Default for GalleryParams {
    fn default() -> Self {
        Self {
            limit: 0,
            order: GalleryOrder::Display,
            with_content: true,
        }
    }
}

impl GalleryParams {
    /// Limit the number of member albums.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Override album order.
    #[must_use]
    pub const fn with_order(mut self, order: GalleryOrder) -> Self {
        self.order = order;
        self
    }

    /// Include or omit album content.
    #[must_use]
    pub const fn with_content(mut self, with_content: bool) -> Self {
        self.with_content = with_content;
        self
    }

    /// Convert the parameters into query options.
    #[must_use]
    pub fn to_options(&self, gallery_id: u64) -> QueryOptions {
        let mut options = QueryOptions::new();
        options.insert("gallery_id", gallery_id);
        options.insert("limit", self.limit);
        options.insert("order", self.order.as_str());
        options.insert_flag("with_content", self.with_content);
        options
    }
}

/// Parameters for `get_album_list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumListParams {
    /// Only published albums.
    pub only_published: bool,
    /// Only active content.
    pub only_active: bool,
    /// Albums without their content.
    pub list_only: bool,
    /// Only smart albums.
    pub only_smart: bool,
    /// Exclude smart albums.
    pub exclude_smart: bool,
    /// Tag filter; empty means unfiltered.
    pub tags: TagList,
    /// Albums must carry every tag rather than any.
    pub tags_exclusive: bool,
}

impl Default for AlbumListParams {
    fn default() -> Self {
        Self {
            only_published: true,
            only_active: true,
            list_only: false,
            only_smart: false,
            exclude_smart: false,
            tags: TagList::new(),
            tags_exclusive: true,
        }
    }
}

impl AlbumListParams {
    /// Filter by one or more tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<TagList>, exclusive: bool) -> Self {
        self.tags = tags.into();
        self.tags_exclusive = exclusive;
        self
    }

    /// Convert the parameters into query options.
    #[must_use]
    pub fn to_options(&self) -> QueryOptions {
        let mut options = QueryOptions::new();
        options.insert_flag("only_published", self.only_published);
        options.insert_flag("only_active", self.only_active);
        options.insert_flag("list_only", self.list_only);
        options.insert_flag("only_smart", self.only_smart);
        options.insert_flag("exclude_smart", self.exclude_smart);
        options.insert_tags(&self.tags, self.tags_exclusive);
        options
    }
}

/// Parameters for `get_album`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbumParams {
    /// Only active content.
    pub only_active: bool,
}

impl Default for AlbumParams {
    fn default() -> Self {
        Self { only_active: true }
    }
}

impl AlbumParams {
    /// Convert the parameters into query options.
    #[must_use]
    pub fn to_options(&self, album_id: u64) -> QueryOptions {
        let mut options = QueryOptions::new();
        options.insert("album_id", album_id);
        options.insert_flag("only_active", self.only_active);
        options
    }
}

/// Options for `get_associated_galleries`.
#[must_use]
pub fn associated_galleries_options(album_id: u64, exclude: &IdList) -> QueryOptions {
    let mut options = QueryOptions::new();
    options.insert("album_id", album_id);
    if !exclude.is_empty() {
        options.insert("exclude", exclude.joined());
    }
    options
}

/// Parameters for `get_content_list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentListParams {
    /// Number of items to return; 0 returns all.
    pub limit: u32,
    /// Only images (no video).
    pub only_images: bool,
    /// Only active content.
    pub only_active: bool,
    /// Sort field.
    pub sort_on: ContentSort,
    /// Sort direction.
    pub sort_direction: SortDirection,
    /// Restrict to a gallery or album; requires `scope_id`.
    #[serde(default, with = "optional_scope")]
    pub scope: Option<Scope>,
    /// Id of the gallery or album named by `scope`.
    pub scope_id: Option<u64>,
    /// Tag filter; empty means unfiltered.
    pub tags: TagList,
    /// Content must carry every tag rather than any.
    pub tags_exclusive: bool,
}

impl Default for ContentListParams {
    fn default() -> Self {
        Self {
            limit: 0,
            only_images: false,
            only_active: true,
            sort_on: ContentSort::CreatedOn,
            sort_direction: SortDirection::Desc,
            scope: None,
            scope_id: None,
            tags: TagList::new(),
            tags_exclusive: true,
        }
    }
}

impl ContentListParams {
    /// Limit the number of items.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Sort by a field in a direction.
    #[must_use]
    pub const fn with_sort(mut self, sort_on: ContentSort, direction: SortDirection) -> Self {
        self.sort_on = sort_on;
        self.sort_direction = direction;
        self
    }

    /// Restrict to members of one gallery or album.
    #[must_use]
    pub const fn with_scope(mut self, scope: Scope, scope_id: u64) -> Self {
        self.scope = Some(scope);
        self.scope_id = Some(scope_id);
        self
    }

    /// Filter by one or more tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<TagList>, exclusive: bool) -> Self {
        self.tags = tags.into();
        self.tags_exclusive = exclusive;
        self
    }

    /// Convert the parameters into query options.
    ///
    /// A random sort draws a new `buster` value on every call.
    #[must_use]
    pub fn to_options(&self) -> QueryOptions {
        let mut options = QueryOptions::new();
        options.insert("limit", self.limit);
        options.insert_flag("only_images", self.only_images);
        options.insert_flag("only_active", self.only_active);
        options.insert("sort_on", self.sort_on.as_str());
        options.insert("sort_direction", self.sort_direction.wire_value());

        if self.sort_on == ContentSort::Random {
            options.insert("buster", cache_buster());
        }

        if let Some((scope, id)) = scope_pair(self.scope, self.scope_id) {
            options.insert("scope", scope.as_str());
            options.insert("scope_id", id);
        }

        options.insert_tags(&self.tags, self.tags_exclusive);
        options
    }
}

/// Parameters for `get_users`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserListParams {
    /// Ordering.
    pub sort: UserSort,
    /// Restrict to contributors of a gallery or album; requires `scope_id`.
    #[serde(default, with = "optional_scope")]
    pub scope: Option<Scope>,
    /// Id of the gallery or album named by `scope`.
    pub scope_id: Option<u64>,
    /// Include users who only updated content, not just creators.
    pub scope_all: bool,
}

impl UserListParams {
    /// Set the ordering.
    #[must_use]
    pub const fn with_sort(mut self, sort: UserSort) -> Self {
        self.sort = sort;
        self
    }

    /// Restrict to contributors of one gallery or album.
    #[must_use]
    pub const fn with_scope(mut self, scope: Scope, scope_id: u64, scope_all: bool) -> Self {
        self.scope = Some(scope);
        self.scope_id = Some(scope_id);
        self.scope_all = scope_all;
        self
    }

    /// Convert the parameters into query options.
    #[must_use]
    pub fn to_options(&self) -> QueryOptions {
        let mut options = QueryOptions::new();
        options.insert("sort", self.sort.as_str());

        if let Some((scope, id)) = scope_pair(self.scope, self.scope_id) {
            options.insert("user_scope_model", scope.as_str());
            options.insert("user_scope_id", id);
            options.insert_flag("user_scope_all", self.scope_all);
        }

        options
    }
}
