#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ChangeType {
    Normal,
    Insert,
    Delete,
}

/// Direction of a "jump to changed region" request.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum RelativePathPosition {
    #[default]
    Next,
    Previous,
}

impl RelativePathPosition {
    /// Where to scroll after landing in a different file while moving in this direction.
    pub const fn scroll_target(self) -> ScrollTarget {
        match self {
            Self::Next => ScrollTarget::FirstDiff,
            Self::Previous => ScrollTarget::LastDiff,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum ScrollTarget {
    FirstDiff,
    LastDiff,
}
