//! Column layouts for the tournament tables the listing has used over time.
//!
//! A [`Schema`] bundles the header tokens used to recognise a table with the
//! positions of each semantic field, so one extractor serves every layout.

pub const PLACEHOLDER_NAME: &str = "NAF Tournament";
pub const MAJOR_MARKER: &str = " [MAJOR]";
pub const LOCATION_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Country,
    Region,
    City,
    StartDate,
    EndDate,
    Variant,
    Major,
}

/// Column index for each field a layout carries. `None` means the layout has
/// no such column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub name: usize,
    pub start_date: usize,
    pub end_date: Option<usize>,
    pub city: Option<usize>,
    pub region: Option<usize>,
    pub country: Option<usize>,
    pub variant: Option<usize>,
    pub major: Option<usize>,
}

impl ColumnMap {
    pub fn index_of(&self, field: Field) -> Option<usize> {
        match field {
            Field::Name => Some(self.name),
            Field::StartDate => Some(self.start_date),
            Field::EndDate => self.end_date,
            Field::City => self.city,
            Field::Region => self.region,
            Field::Country => self.country,
            Field::Variant => self.variant,
            Field::Major => self.major,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub name: &'static str,
    /// Expected header tokens, matched by position as substrings.
    pub headers: Vec<&'static str>,
    /// Token that identifies the table when the full header row does not match.
    pub keyword: &'static str,
    /// Rows with fewer data cells are dropped.
    pub min_cells: usize,
    pub columns: ColumnMap,
}

impl Schema {
    /// Current listing: tournament, country, state, city, start, end, variant, major.
    pub fn naf() -> Self {
        Self {
            name: "naf",
            headers: vec![
                "tournament",
                "country",
                "state",
                "city",
                "start date",
                "end date",
                "variant",
                "major",
            ],
            keyword: "tournament",
            min_cells: 8,
            columns: ColumnMap {
                name: 0,
                country: Some(1),
                region: Some(2),
                city: Some(3),
                start_date: 4,
                end_date: Some(5),
                variant: Some(6),
                major: Some(7),
            },
        }
    }

    /// Older seven column layout with a ruleset format instead of variant/major.
    pub fn naf_compact() -> Self {
        Self {
            name: "naf_compact",
            headers: vec![
                "tournament",
                "format",
                "start",
                "end",
                "city",
                "region",
                "country",
            ],
            keyword: "tournament",
            min_cells: 7,
            columns: ColumnMap {
                name: 0,
                variant: Some(1),
                start_date: 2,
                end_date: Some(3),
                city: Some(4),
                region: Some(5),
                country: Some(6),
                major: None,
            },
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "naf" => Some(Self::naf()),
            "naf_compact" => Some(Self::naf_compact()),
            _ => None,
        }
    }

    pub fn available() -> [&'static str; 2] {
        ["naf", "naf_compact"]
    }
}
