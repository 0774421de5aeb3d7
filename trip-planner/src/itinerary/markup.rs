//! Removal of provider presentation markup from instruction text.

use std::sync::LazyLock;

use regex::Regex;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));

/// Removes every `<...>` tag, keeping the text between tags.
///
/// # Examples
///
/// ```
/// use trip_planner::itinerary::strip_markup;
///
/// assert_eq!(strip_markup("Turn <b>left</b> onto 北京东路"), "Turn left onto 北京东路");
/// assert_eq!(strip_markup("no tags"), "no tags");
/// ```
pub fn strip_markup(text: &str) -> String {
    TAG.replace_all(text, "").into_owned()
}
