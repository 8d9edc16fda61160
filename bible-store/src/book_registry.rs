use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use bible_model::{BookInfo, Testament};

struct BookDef {
    id: &'static str,
    name: &'static str,
    testament: Testament,
    chapters: u32,
    verses: u32,
    /// Abbreviations and spelling variants beyond the id and display name.
    aliases: &'static [&'static str],
}

const fn ot(id: &'static str, name: &'static str, chapters: u32, verses: u32, aliases: &'static [&'static str]) -> BookDef {
    BookDef { id, name, testament: Testament::Old, chapters, verses, aliases }
}

const fn nt(id: &'static str, name: &'static str, chapters: u32, verses: u32, aliases: &'static [&'static str]) -> BookDef {
    BookDef { id, name, testament: Testament::New, chapters, verses, aliases }
}

/// Canonical order. Chapter counts are fixed; verse totals follow KJV versification.
const BOOKS: [BookDef; 66] = [
    ot("genesis", "Genesis", 50, 1533, &["gen", "ge", "gn"]),
    ot("exodus", "Exodus", 40, 1213, &["exod", "exo", "ex"]),
    ot("leviticus", "Leviticus", 27, 859, &["lev", "le", "lv"]),
    ot("numbers", "Numbers", 36, 1288, &["num", "nu", "nm", "nb"]),
    ot("deuteronomy", "Deuteronomy", 34, 959, &["deut", "deu", "de", "dt"]),
    ot("joshua", "Joshua", 24, 658, &["josh", "jos", "jsh"]),
    ot("judges", "Judges", 21, 618, &["judg", "jdg", "jg", "jdgs"]),
    ot("ruth", "Ruth", 4, 85, &["rut", "rth", "ru"]),
    ot("1samuel", "1 Samuel", 31, 810, &["1 sam", "1 sa", "1 sm", "1 s"]),
    ot("2samuel", "2 Samuel", 24, 695, &["2 sam", "2 sa", "2 sm", "2 s"]),
    ot("1kings", "1 Kings", 22, 816, &["1 kgs", "1 ki", "1 kin", "1 k"]),
    ot("2kings", "2 Kings", 25, 719, &["2 kgs", "2 ki", "2 kin", "2 k"]),
    ot("1chronicles", "1 Chronicles", 29, 942, &["1 chron", "1 chr", "1 ch"]),
    ot("2chronicles", "2 Chronicles", 36, 822, &["2 chron", "2 chr", "2 ch"]),
    ot("ezra", "Ezra", 10, 280, &["ezr", "ez"]),
    ot("nehemiah", "Nehemiah", 13, 406, &["neh", "ne"]),
    ot("esther", "Esther", 10, 167, &["esth", "est", "es"]),
    ot("job", "Job", 42, 1070, &["jb"]),
    ot("psalms", "Psalms", 150, 2461, &["psalm", "psa", "psm", "pss", "ps"]),
    ot("proverbs", "Proverbs", 31, 915, &["prov", "pro", "prv", "pr"]),
    ot("ecclesiastes", "Ecclesiastes", 12, 222, &["eccles", "eccl", "ecc", "ec", "qoheleth"]),
    ot("songofsolomon", "Song of Solomon", 8, 117, &["song of songs", "song", "songs", "sos", "so", "canticles", "sng"]),
    ot("isaiah", "Isaiah", 66, 1292, &["isa", "is"]),
    ot("jeremiah", "Jeremiah", 52, 1364, &["jer", "je", "jr"]),
    ot("lamentations", "Lamentations", 5, 154, &["lam", "la"]),
    ot("ezekiel", "Ezekiel", 48, 1273, &["ezek", "eze", "ezk"]),
    ot("daniel", "Daniel", 12, 357, &["dan", "da", "dn"]),
    ot("hosea", "Hosea", 14, 197, &["hos", "ho"]),
    ot("joel", "Joel", 3, 73, &["jl", "joe"]),
    ot("amos", "Amos", 9, 146, &["am", "amo"]),
    ot("obadiah", "Obadiah", 1, 21, &["obad", "oba", "ob"]),
    ot("jonah", "Jonah", 4, 48, &["jon", "jnh"]),
    ot("micah", "Micah", 7, 105, &["mic", "mc"]),
    ot("nahum", "Nahum", 3, 47, &["nah", "na"]),
    ot("habakkuk", "Habakkuk", 3, 56, &["hab", "hb"]),
    ot("zephaniah", "Zephaniah", 3, 53, &["zeph", "zep", "zp"]),
    ot("haggai", "Haggai", 2, 38, &["hag", "hg"]),
    ot("zechariah", "Zechariah", 14, 211, &["zech", "zec", "zc"]),
    ot("malachi", "Malachi", 4, 55, &["mal", "ml"]),
    nt("matthew", "Matthew", 28, 1071, &["matt", "mat", "mt"]),
    nt("mark", "Mark", 16, 678, &["mrk", "mar", "mk", "mr"]),
    nt("luke", "Luke", 24, 1151, &["luk", "lk"]),
    nt("john", "John", 21, 879, &["joh", "jhn", "jn"]),
    nt("acts", "Acts", 28, 1007, &["act", "ac", "acts of the apostles"]),
    nt("romans", "Romans", 16, 433, &["rom", "ro", "rm"]),
    nt("1corinthians", "1 Corinthians", 16, 437, &["1 cor", "1 co"]),
    nt("2corinthians", "2 Corinthians", 13, 257, &["2 cor", "2 co"]),
    nt("galatians", "Galatians", 6, 149, &["gal", "ga"]),
    nt("ephesians", "Ephesians", 6, 155, &["eph", "ephes"]),
    nt("philippians", "Philippians", 4, 104, &["phil", "php", "pp"]),
    nt("colossians", "Colossians", 4, 95, &["col", "co"]),
    nt("1thessalonians", "1 Thessalonians", 5, 89, &["1 thess", "1 thes", "1 th"]),
    nt("2thessalonians", "2 Thessalonians", 3, 47, &["2 thess", "2 thes", "2 th"]),
    nt("1timothy", "1 Timothy", 6, 113, &["1 tim", "1 ti"]),
    nt("2timothy", "2 Timothy", 4, 83, &["2 tim", "2 ti"]),
    nt("titus", "Titus", 3, 46, &["tit", "ti"]),
    nt("philemon", "Philemon", 1, 25, &["philem", "phlm", "phm"]),
    nt("hebrews", "Hebrews", 13, 303, &["heb"]),
    nt("james", "James", 5, 108, &["jas", "jm"]),
    nt("1peter", "1 Peter", 5, 105, &["1 pet", "1 pe", "1 pt", "1 p"]),
    nt("2peter", "2 Peter", 3, 61, &["2 pet", "2 pe", "2 pt", "2 p"]),
    nt("1john", "1 John", 5, 105, &["1 jn", "1 jhn", "1 jo", "1 joh"]),
    nt("2john", "2 John", 1, 13, &["2 jn", "2 jhn", "2 jo", "2 joh"]),
    nt("3john", "3 John", 1, 14, &["3 jn", "3 jhn", "3 jo", "3 joh"]),
    nt("jude", "Jude", 1, 25, &["jud", "jde"]),
    nt("revelation", "Revelation", 22, 404, &["revelations", "rev", "re", "rv", "apocalypse"]),
];

/// Canonical chapter total across all books.
pub const CANONICAL_CHAPTERS: u32 = 1189;
/// Canonical verse total across all books (KJV versification).
pub const CANONICAL_VERSES: u32 = 31102;

const NUMBER_PREFIXES: [&[&str]; 3] = [
    &["i", "first", "1st"],
    &["ii", "second", "2nd"],
    &["iii", "third", "3rd"],
];

/// Static book metadata plus the alias lookup table.
pub struct BookRegistry {
    books: Vec<BookInfo>,
    alias_index: HashMap<String, usize>,
}

impl BookRegistry {
    /// Process-wide registry, built on first use and never mutated afterwards.
    pub fn global() -> &'static BookRegistry {
        static REGISTRY: OnceLock<BookRegistry> = OnceLock::new();
        REGISTRY.get_or_init(BookRegistry::build)
    }

    fn build() -> Self {
        let books: Vec<BookInfo> = BOOKS
            .iter()
            .enumerate()
            .map(|(i, def)| BookInfo {
                id: def.id.to_string(),
                name: def.name.to_string(),
                testament: def.testament,
                chapters: def.chapters,
                verses: def.verses,
                ordinal: i as u32 + 1,
            })
            .collect();

        let mut alias_index = HashMap::new();
        // Ids and full names first so an abbreviation never shadows a real name.
        for (idx, def) in BOOKS.iter().enumerate() {
            insert_alias(&mut alias_index, def.id, idx);
            insert_alias(&mut alias_index, &def.name.to_lowercase(), idx);
        }
        for (idx, def) in BOOKS.iter().enumerate() {
            for alias in def.aliases {
                insert_alias(&mut alias_index, alias, idx);
            }
            if let Some((number, rest)) = split_number_prefix(&def.name.to_lowercase()) {
                let spelled = NUMBER_PREFIXES.get(number.saturating_sub(1)).copied().unwrap_or(&[]);
                for prefix in spelled {
                    insert_alias(&mut alias_index, &format!("{prefix} {rest}"), idx);
                }
            }
        }
        Self { books, alias_index }
    }

    /// Resolve any recognised spelling to a canonical book id.
    ///
    /// Tries, in order: the whitespace-collapsed lowercase input, the same with
    /// spaces removed, with periods stripped, and with both removed.
    pub fn normalize(&self, input: &str) -> Option<&str> {
        let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        if collapsed.is_empty() {
            return None;
        }
        let no_space = collapsed.replace(' ', "");
        let no_period = collapsed.replace('.', "").split_whitespace().collect::<Vec<_>>().join(" ");
        let bare = no_space.replace('.', "");

        let found = [collapsed.as_str(), no_space.as_str(), no_period.as_str(), bare.as_str()]
            .into_iter()
            .find_map(|candidate| self.alias_index.get(candidate).copied());
        found.map(|idx| self.books[idx].id.as_str())
    }

    pub fn get(&self, book_id: &str) -> Option<&BookInfo> {
        self.books.iter().find(|b| b.id == book_id)
    }

    /// All 66 books in canonical order.
    pub fn canonical(&self) -> &[BookInfo] {
        &self.books
    }

    /// Distinct books, old testament first, alphabetical by name within a testament.
    pub fn listing(&self) -> Vec<BookInfo> {
        let mut seen: HashSet<(&str, u32)> = HashSet::new();
        let mut out: Vec<BookInfo> = self
            .books
            .iter()
            .filter(|b| seen.insert((b.name.as_str(), b.chapters)))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.testament.cmp(&b.testament).then_with(|| a.name.cmp(&b.name)));
        out
    }
}

fn insert_alias(index: &mut HashMap<String, usize>, alias: &str, idx: usize) {
    let alias = alias.to_lowercase();
    let compact = alias.replace(' ', "");
    index.entry(alias).or_insert(idx);
    index.entry(compact).or_insert(idx);
}

/// "1 samuel" -> (1, "samuel")
fn split_number_prefix(name: &str) -> Option<(usize, &str)> {
    let (head, rest) = name.split_once(' ')?;
    let number = head.parse::<usize>().ok()?;
    Some((number, rest))
}

/// Resolve a book spelling (name, abbreviation, spacing variant) to its canonical id.
pub fn normalize_book_name(input: &str) -> Option<&'static str> {
    BookRegistry::global().normalize(input)
}

pub fn book_info(book_id: &str) -> Option<&'static BookInfo> {
    BookRegistry::global().get(book_id)
}

pub fn all_books() -> Vec<BookInfo> {
    BookRegistry::global().listing()
}

pub fn canonical_books() -> &'static [BookInfo] {
    BookRegistry::global().canonical()
}
