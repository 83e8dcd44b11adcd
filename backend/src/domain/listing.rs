//! Paging and ordering of discount code collections.

use std::str::FromStr;

/// Page size applied when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Requested page of a collection.
///
/// A `size` of `None` disables paging: the whole collection is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: u32,
    size: Option<u32>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            number: 1,
            size: Some(DEFAULT_PAGE_SIZE),
        }
    }
}

impl PageRequest {
    /// Build a page request. Page numbers start at 1; `0` is clamped to 1.
    /// A size of `0` disables paging.
    pub fn new(number: u32, size: u32) -> Self {
        Self {
            number: number.max(1),
            size: (size > 0).then_some(size),
        }
    }

    /// One-based page number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Page size, or `None` when paging is disabled.
    pub fn size(&self) -> Option<u32> {
        self.size
    }

    /// Rows to skip before the page starts.
    pub fn offset(&self) -> u64 {
        match self.size {
            Some(size) => u64::from(self.number - 1) * u64::from(size),
            None => 0,
        }
    }

    /// Number of the last page for a collection of `total` rows. Empty
    /// collections still have one (empty) page.
    pub fn last_page(&self, total: u64) -> u64 {
        match self.size {
            Some(size) => total.div_ceil(u64::from(size)).max(1),
            None => 1,
        }
    }
}

/// Sortable discount code attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Id,
    Code,
    Value,
    TicketsNumber,
    MinQuantity,
    MaxQuantity,
    ValidFrom,
    ValidTill,
    CreatedAt,
}

impl SortField {
    /// Wire name used in the `sort` parameter.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Code => "code",
            Self::Value => "value",
            Self::TicketsNumber => "tickets-number",
            Self::MinQuantity => "min-quantity",
            Self::MaxQuantity => "max-quantity",
            Self::ValidFrom => "valid-from",
            Self::ValidTill => "valid-till",
            Self::CreatedAt => "created-at",
        }
    }
}

/// Sort parameter named an attribute that cannot be sorted on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} has no attribute to sort on")]
pub struct UnknownSortField {
    pub field: String,
}

impl FromStr for SortField {
    type Err = UnknownSortField;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let field = match raw {
            "id" => Self::Id,
            "code" => Self::Code,
            "value" => Self::Value,
            "tickets-number" => Self::TicketsNumber,
            "min-quantity" => Self::MinQuantity,
            "max-quantity" => Self::MaxQuantity,
            "valid-from" => Self::ValidFrom,
            "valid-till" => Self::ValidTill,
            "created-at" => Self::CreatedAt,
            other => {
                return Err(UnknownSortField {
                    field: other.to_owned(),
                });
            }
        };
        Ok(field)
    }
}

/// One ordering criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

impl SortKey {
    /// Parse a comma separated `sort` parameter such as `-value,code`.
    ///
    /// # Examples
    /// ```
    /// use ticketing_backend::domain::listing::{SortField, SortKey};
    ///
    /// let keys = SortKey::parse_list("-value,code").unwrap();
    /// assert_eq!(keys[0], SortKey { field: SortField::Value, descending: true });
    /// assert_eq!(keys[1], SortKey { field: SortField::Code, descending: false });
    /// ```
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, UnknownSortField> {
        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| match part.strip_prefix('-') {
                Some(name) => name.parse().map(|field| Self {
                    field,
                    descending: true,
                }),
                None => part.parse().map(|field| Self {
                    field,
                    descending: false,
                }),
            })
            .collect()
    }
}
