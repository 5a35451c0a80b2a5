use linemark_types::RelativePathPosition;

use crate::models::EntryStatusMap;

/// Finds the nearest other file that has a pending change.
///
/// Implementations must return a path strictly after (`Next`) or before
/// (`Previous`) `current_path` in `path_list` whose status is not unchanged,
/// or `None` when there is no such path.
pub trait RelativePathFinder {
    fn find_relative_path(
        &self,
        current_path: &str,
        path_list: &[String],
        status_map: &EntryStatusMap,
        position: RelativePathPosition,
    ) -> Option<String>;
}

/// Walks the ordered path list outward from the current path.
#[derive(Copy, Clone, Debug, Default)]
pub struct OrderedPathFinder;

impl RelativePathFinder for OrderedPathFinder {
    fn find_relative_path(
        &self,
        current_path: &str,
        path_list: &[String],
        status_map: &EntryStatusMap,
        position: RelativePathPosition,
    ) -> Option<String> {
        find_relative_path_with_diff(current_path, path_list, status_map, position)
    }
}

/// See [`RelativePathFinder`]. When `current_path` is not in the list the walk
/// starts from the list edge facing `position`.
pub fn find_relative_path_with_diff(
    current_path: &str,
    path_list: &[String],
    status_map: &EntryStatusMap,
    position: RelativePathPosition,
) -> Option<String> {
    let current = path_list.iter().position(|p| p == current_path);
    let has_change = |path: &&String| status_map.status(path).is_changed();

    let found = match position {
        RelativePathPosition::Next => {
            let start = current.map_or(0, |i| i + 1);
            path_list.iter().skip(start).find(has_change)
        }
        RelativePathPosition::Previous => {
            let end = current.unwrap_or(path_list.len());
            path_list[..end].iter().rev().find(has_change)
        }
    };

    if found.is_none() {
        log::debug!("no {position:?} changed path relative to {current_path}");
    }
    found.cloned()
}
