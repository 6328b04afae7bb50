//! Fixed vocabularies the planner expands into queries.

/// Substrings that tend to appear in titles of multi-volume works.
pub const SERIES_KEYWORDS: &[&str] = &[
    "volume 1",
    "volume 2",
    "volume 3",
    "vol. 1",
    "vol. 2",
    "book 1",
    "book 2",
    "book 3",
    "book one",
    "book two",
    "book three",
    "part one",
    "part two",
    "first book",
    "second book",
    "trilogy",
    "quartet",
    "saga",
    "chronicles",
    "cycle",
    "series",
    "collection",
    "omnibus",
    "box set",
    "boxed set",
    "complete series",
    "the complete",
    "sequence",
    "tome 1",
    "band 1",
    "tomo 1",
    "libro 1",
    "episode 1",
    "chapter one",
    "final book",
    "conclusion",
    "prequel",
    "sequel",
    "companion novel",
    "graphic novel volume",
    "manga volume",
    "light novel",
];

/// Authors with long-running series.
pub const PROLIFIC_AUTHORS: &[&str] = &[
    "Terry Pratchett",
    "Brandon Sanderson",
    "Robert Jordan",
    "J.K. Rowling",
    "George R.R. Martin",
    "Stephen King",
    "Agatha Christie",
    "Arthur Conan Doyle",
    "Isaac Asimov",
    "Anne McCaffrey",
    "Mercedes Lackey",
    "Terry Goodkind",
    "Raymond E. Feist",
    "David Eddings",
    "Robin Hobb",
    "Ursula K. Le Guin",
    "Janet Evanovich",
    "Lee Child",
    "James Patterson",
    "Sue Grafton",
    "Michael Connelly",
    "Louise Penny",
    "Jim Butcher",
    "Laurell K. Hamilton",
    "Charlaine Harris",
    "Diana Gabaldon",
    "Rick Riordan",
    "Ann M. Martin",
    "R.L. Stine",
    "Enid Blyton",
    "Erin Hunter",
    "Lemony Snicket",
    "Patrick O'Brian",
    "C.S. Forester",
    "Bernard Cornwell",
    "Dudley Pope",
    "Alexander McCall Smith",
    "Ellis Peters",
    "Rex Stout",
    "Georges Simenon",
    "Ed McBain",
    "Clive Cussler",
    "Tom Clancy",
    "Dean Koontz",
    "Piers Anthony",
    "Orson Scott Card",
    "Frank Herbert",
    "Anne Rice",
    "L.M. Montgomery",
    "Laura Ingalls Wilder",
    "Eiichiro Oda",
    "Masashi Kishimoto",
    "Akira Toriyama",
    "Naoko Takeuchi",
    "Rumiko Takahashi",
    "Osamu Tezuka",
    "Hergé",
    "René Goscinny",
    "Stan Lee",
    "Alan Moore",
    "Neil Gaiman",
];

/// Named franchises and their common alternate titles.
pub const FRANCHISES: &[(&str, &[&str])] = &[
    ("Discworld", &[]),
    ("Harry Potter", &[]),
    ("The Wheel of Time", &["Wheel of Time"]),
    ("A Song of Ice and Fire", &["Game of Thrones"]),
    ("The Stormlight Archive", &["Stormlight"]),
    ("Mistborn", &[]),
    ("The Dark Tower", &[]),
    ("Dune", &[]),
    ("Foundation", &[]),
    ("The Expanse", &[]),
    ("Star Wars", &[]),
    ("Star Trek", &[]),
    ("Doctor Who", &[]),
    ("Warhammer 40,000", &["Warhammer 40k", "Horus Heresy"]),
    ("Forgotten Realms", &[]),
    ("Dragonlance", &[]),
    ("The Witcher", &["Wiedźmin"]),
    ("The Chronicles of Narnia", &["Narnia"]),
    ("The Lord of the Rings", &["Middle-earth"]),
    ("Percy Jackson", &[]),
    ("The Hunger Games", &[]),
    ("Twilight", &[]),
    ("Goosebumps", &[]),
    ("The Baby-Sitters Club", &["Baby-Sitters Club"]),
    ("Nancy Drew", &[]),
    ("Hardy Boys", &[]),
    ("Sherlock Holmes", &[]),
    ("Hercule Poirot", &["Poirot"]),
    ("Jack Reacher", &["Reacher"]),
    ("Alex Cross", &[]),
    ("Stephanie Plum", &[]),
    ("Outlander", &[]),
    ("The Dresden Files", &["Dresden Files"]),
    ("Aubrey-Maturin", &["Master and Commander"]),
    ("Sharpe", &[]),
    ("Hornblower", &[]),
    ("Warriors", &["Warrior Cats"]),
    ("A Series of Unfortunate Events", &[]),
    ("Redwall", &[]),
    ("Animorphs", &[]),
    ("Wings of Fire", &[]),
    ("The Magic Tree House", &["Magic Tree House"]),
    ("Diary of a Wimpy Kid", &[]),
    ("Dragon Ball", &["Dragonball"]),
    ("One Piece", &[]),
    ("Naruto", &[]),
    ("Bleach", &[]),
    ("Sailor Moon", &["Bishoujo Senshi Sailor Moon"]),
    ("Attack on Titan", &["Shingeki no Kyojin"]),
    ("Fullmetal Alchemist", &["Hagane no Renkinjutsushi"]),
    ("Death Note", &[]),
    ("Astérix", &["Asterix"]),
    ("Tintin", &["Les Aventures de Tintin"]),
    ("Lucky Luke", &[]),
    ("Spirou", &["Spirou et Fantasio"]),
    ("Blake et Mortimer", &["Blake and Mortimer"]),
    ("The Sandman", &[]),
    ("Spider-Man", &["Amazing Spider-Man"]),
    ("Batman", &[]),
    ("X-Men", &["Uncanny X-Men"]),
    ("The Walking Dead", &[]),
];

/// Publishers known for numbered series.
pub const SERIES_PUBLISHERS: &[&str] = &[
    "Tor",
    "Del Rey",
    "DAW",
    "Baen",
    "Orbit",
    "Ace Books",
    "Bantam",
    "Harlequin",
    "Scholastic",
    "Puffin",
    "HarperCollins",
    "Penguin",
    "Pocket Books",
    "Gollancz",
    "Black Library",
    "Wizards of the Coast",
    "Viz Media",
    "Shueisha",
    "Kodansha",
    "Shogakukan",
    "Yen Press",
    "Seven Seas",
    "Tokyopop",
    "Square Enix",
    "Marvel",
    "DC Comics",
    "Image Comics",
    "Dark Horse",
    "IDW",
    "Dargaud",
    "Dupuis",
    "Casterman",
    "Glénat",
    "Le Lombard",
    "Carlsen",
    "Panini",
    "Egmont",
    "Bastei Lübbe",
    "Heyne",
    "Planeta",
];

/// Catalog language codes with series markers in that language.
pub const LANGUAGE_TERMS: &[(&str, &[&str])] = &[
    ("fre", &["tome", "volume", "série", "cycle", "intégrale"]),
    ("ger", &["band", "teil", "reihe", "folge", "sammelband"]),
    ("spa", &["tomo", "libro", "saga", "volumen", "serie"]),
    ("ita", &["volume", "libro", "saga", "serie", "ciclo"]),
    ("por", &["volume", "livro", "saga", "série"]),
    ("dut", &["deel", "boek", "reeks", "serie"]),
    ("jpn", &["巻", "シリーズ", "第1巻"]),
    ("kor", &["권", "시리즈"]),
    ("chi", &["卷", "系列"]),
    ("rus", &["том", "книга", "серия"]),
    ("pol", &["tom", "część", "cykl", "saga"]),
    ("swe", &["del", "bok", "serie"]),
];

/// Sub-genres where series are the norm.
pub const GENRES: &[&str] = &[
    "epic fantasy",
    "high fantasy",
    "urban fantasy",
    "dark fantasy",
    "sword and sorcery",
    "space opera",
    "military science fiction",
    "cyberpunk",
    "dystopian fiction",
    "post-apocalyptic fiction",
    "alternate history",
    "cozy mystery",
    "detective and mystery stories",
    "police procedural",
    "legal thriller",
    "spy stories",
    "historical fiction",
    "naval fiction",
    "western stories",
    "paranormal romance",
    "regency romance",
    "romantic suspense",
    "horror fiction",
    "vampires fiction",
    "young adult fiction",
    "juvenile fiction",
    "children's stories",
    "chapter books",
    "school stories",
    "animal stories",
    "fantasy comic books, strips",
    "graphic novels",
    "superhero comic books",
    "manga",
    "shonen manga",
    "shojo manga",
    "seinen manga",
    "light novels",
    "bandes dessinées",
    "litrpg",
];

/// Volume-ish words paired with letters and numbers in the ordinal sweep.
pub const ORDINAL_PREFIXES: &[&str] = &["book", "series", "volume"];

/// Volume-ish words paired with numbers in the numeric sweep.
pub const NUMERIC_PREFIXES: &[&str] = &["book", "volume", "part", "tome", "vol"];
