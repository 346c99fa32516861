use std::fmt;

/// Alias marker value shared by every entity in a run.
pub const DEFAULT_ALIAS: &str = "t";

///
/// Marker
///
/// One segment of an annotation tag. Markers serialize in append order;
/// the ordering rules live in the code that appends them, not here.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Marker {
    /// Column name, always the first segment of a column tag.
    Name(String),
    /// Qualified table name, always the first segment of an entity tag.
    Table(String),
    Pk,
    Hstore,
    Array,
    Uuid,
    NullZero,
    SoftDelete,
    Alias(String),
    Join { column: String, target_pk: String },
    BelongsTo,
    /// Removes the field from the ORM's view of the record.
    Ignore,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) | Self::Table(name) => write!(f, "{name}"),
            Self::Pk => write!(f, "pk"),
            Self::Hstore => write!(f, "hstore"),
            Self::Array => write!(f, "array"),
            Self::Uuid => write!(f, "type:uuid"),
            Self::NullZero => write!(f, "nullzero"),
            Self::SoftDelete => write!(f, "soft_delete"),
            Self::Alias(alias) => write!(f, "alias:{alias}"),
            Self::Join { column, target_pk } => write!(f, "join:{column}={target_pk}"),
            Self::BelongsTo => write!(f, "rel:belongs-to"),
            Self::Ignore => write!(f, "-"),
        }
    }
}

///
/// Tag
///
/// Append-only marker list serialized to the `#[relq("…")]` attribute
/// argument. `Ignore` short-circuits: once appended, later appends are
/// no-ops and the tag serializes to `-` alone.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tag {
    markers: Vec<Marker>,
    ignored: bool,
}

impl Tag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A tag that is nothing but the ignore marker.
    #[must_use]
    pub fn ignored() -> Self {
        let mut tag = Self::new();
        tag.push(Marker::Ignore);
        tag
    }

    pub fn push(&mut self, marker: Marker) {
        if self.ignored {
            return;
        }
        if marker == Marker::Ignore {
            self.ignored = true;
        }
        self.markers.push(marker);
    }

    #[must_use]
    pub fn with(mut self, marker: Marker) -> Self {
        self.push(marker);
        self
    }

    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        self.ignored
    }

    #[must_use]
    pub fn render(&self) -> String {
        if self.ignored {
            return Marker::Ignore.to_string();
        }

        self.markers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
