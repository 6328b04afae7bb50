//! Category cascade: manga, then comics, then prose.

use super::matches_name;
use super::signals::subject_matches;
use crate::aggregate::CandidateGroup;
use crate::registry::Category;

const MANGA_PUBLISHERS: &[&str] = &[
    "shueisha",
    "kodansha",
    "shogakukan",
    "square enix",
    "kadokawa",
    "hakusensha",
    "akita shoten",
    "futabasha",
    "viz",
    "viz media",
    "yen press",
    "seven seas",
    "tokyopop",
    "vertical",
    "kana",
    "pika",
    "ki-oon",
    "daiwon",
    "haksan",
    "tong li",
];

const MANGA_SUBJECTS: &[&str] = &[
    "manga",
    "light novel",
    "shonen",
    "shōnen",
    "seinen",
    "shoujo",
    "shojo",
    "manhwa",
    "manhua",
];

const COMICS_PUBLISHERS: &[&str] = &[
    "marvel",
    "dc comics",
    "image comics",
    "dark horse",
    "idw",
    "boom! studios",
    "fantagraphics",
    "drawn & quarterly",
    "vertigo",
    "titan comics",
    "dargaud",
    "dupuis",
    "casterman",
    "le lombard",
    "glénat",
    "delcourt",
    "soleil",
];

const COMICS_SUBJECTS: &[&str] = &[
    "graphic novel",
    "comic book",
    "comics",
    "bande dessinée",
    "bandes dessinées",
    "superhero",
];

/// Classify a group; first matching rule wins.
pub fn categorize(group: &CandidateGroup) -> Category {
    let publisher_in = |list: &[&str]| group.publisher_set().any(|p| matches_name(p, list));

    if publisher_in(MANGA_PUBLISHERS) || subject_matches(group, MANGA_SUBJECTS) {
        Category::Manga
    } else if publisher_in(COMICS_PUBLISHERS) || subject_matches(group, COMICS_SUBJECTS) {
        Category::Comics
    } else {
        Category::Prose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{Aggregator, SeriesCandidate};
    use crate::catalog::CatalogRecord;
    use crate::parser::parse_title;

    fn group(publishers: &[&str], subjects: &[&str]) -> CandidateGroup {
        let mut r = CatalogRecord::new("Foo Saga Volume 1");
        r.publishers = publishers.iter().map(|s| s.to_string()).collect();
        r.subjects = subjects.iter().map(|s| s.to_string()).collect();
        let mut agg = Aggregator::new();
        agg.ingest(SeriesCandidate::new(parse_title(&r.title).unwrap(), &r));
        agg.into_groups().remove(0)
    }

    #[test]
    fn test_manga_by_publisher_or_subject() {
        assert_eq!(categorize(&group(&["Shueisha"], &[])), Category::Manga);
        assert_eq!(categorize(&group(&["VIZ Media LLC"], &[])), Category::Manga);
        assert_eq!(
            categorize(&group(&[], &["Shonen manga"])),
            Category::Manga
        );
        assert_eq!(
            categorize(&group(&[], &["Light novels"])),
            Category::Manga
        );
    }

    #[test]
    fn test_comics_by_publisher_or_subject() {
        assert_eq!(categorize(&group(&["Marvel"], &[])), Category::Comics);
        assert_eq!(
            categorize(&group(&[], &["Comic books, strips, etc"])),
            Category::Comics
        );
        assert_eq!(
            categorize(&group(&[], &["Bandes dessinées"])),
            Category::Comics
        );
    }

    #[test]
    fn test_manga_wins_over_comics() {
        assert_eq!(
            categorize(&group(&["Dark Horse"], &["manga"])),
            Category::Manga
        );
    }

    #[test]
    fn test_prose_fallback() {
        assert_eq!(
            categorize(&group(&["Tor"], &["fiction", "fantasy"])),
            Category::Prose
        );
        assert_eq!(categorize(&group(&[], &[])), Category::Prose);
    }
}
