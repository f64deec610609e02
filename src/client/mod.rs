//! Front-end controllers, written as plain state machines so the same logic
//! drives the terminal subcommands and the tests.

pub mod api;
pub mod columns;
pub mod comparison;
pub mod debounce;
pub mod notify;
pub mod table;

/// Where headshot images live under the static directory.
pub const HEADSHOT_DIR: &str = "nbaheadshots/player_images";

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `First-Last.jpg` from the first and last words of a name.
pub fn headshot_file_name(name: &str) -> String {
    let parts: Vec<&str> = name.split(' ').collect();
    let first = parts.first().copied().unwrap_or_default();
    let last = parts.last().copied().unwrap_or_default();
    format!("{}-{}.jpg", capitalize(first), capitalize(last))
}

pub fn headshot_path(name: &str) -> String {
    format!("{HEADSHOT_DIR}/{}", headshot_file_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headshot_file_name() {
        assert_eq!(headshot_file_name("LeBron James"), "Lebron-James.jpg");
        assert_eq!(headshot_file_name("shai gilgeous-alexander"), "Shai-Gilgeous-alexander.jpg");
        assert_eq!(headshot_file_name("Jaren Jackson Jr."), "Jaren-Jr..jpg");
        assert_eq!(headshot_file_name("Nene"), "Nene-Nene.jpg");
    }

    #[test]
    fn test_headshot_path() {
        assert_eq!(
            headshot_path("Jalen Brunson"),
            "nbaheadshots/player_images/Jalen-Brunson.jpg"
        );
    }
}
