//! # Book Table
//!
//! The 66-book Protestant canon in Almeida order, with chapter counts.
//! Navigation bounds-checks every chapter against this table.

/// A canonical book and how many chapters it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookInfo {
    pub name: &'static str,
    pub chapter_count: u32,
}

const fn book(name: &'static str, chapter_count: u32) -> BookInfo {
    BookInfo {
        name,
        chapter_count,
    }
}

pub const BIBLE_BOOKS: [BookInfo; 66] = [
    // Antigo Testamento
    book("Gênesis", 50),
    book("Êxodo", 40),
    book("Levítico", 27),
    book("Números", 36),
    book("Deuteronômio", 34),
    book("Josué", 24),
    book("Juízes", 21),
    book("Rute", 4),
    book("1 Samuel", 31),
    book("2 Samuel", 24),
    book("1 Reis", 22),
    book("2 Reis", 25),
    book("1 Crônicas", 29),
    book("2 Crônicas", 36),
    book("Esdras", 10),
    book("Neemias", 13),
    book("Ester", 10),
    book("Jó", 42),
    book("Salmos", 150),
    book("Provérbios", 31),
    book("Eclesiastes", 12),
    book("Cantares", 8),
    book("Isaías", 66),
    book("Jeremias", 52),
    book("Lamentações", 5),
    book("Ezequiel", 48),
    book("Daniel", 12),
    book("Oséias", 14),
    book("Joel", 3),
    book("Amós", 9),
    book("Obadias", 1),
    book("Jonas", 4),
    book("Miquéias", 7),
    book("Naum", 3),
    book("Habacuque", 3),
    book("Sofonias", 3),
    book("Ageu", 2),
    book("Zacarias", 14),
    book("Malaquias", 4),
    // Novo Testamento
    book("Mateus", 28),
    book("Marcos", 16),
    book("Lucas", 24),
    book("João", 21),
    book("Atos", 28),
    book("Romanos", 16),
    book("1 Coríntios", 16),
    book("2 Coríntios", 13),
    book("Gálatas", 6),
    book("Efésios", 6),
    book("Filipenses", 4),
    book("Colossenses", 4),
    book("1 Tessalonicenses", 5),
    book("2 Tessalonicenses", 3),
    book("1 Timóteo", 6),
    book("2 Timóteo", 4),
    book("Tito", 3),
    book("Filemom", 1),
    book("Hebreus", 13),
    book("Tiago", 5),
    book("1 Pedro", 5),
    book("2 Pedro", 3),
    book("1 João", 5),
    book("2 João", 1),
    book("3 João", 1),
    book("Judas", 1),
    book("Apocalipse", 22),
];

/// First book of the canon; the default selection.
pub fn first_book() -> &'static BookInfo {
    &BIBLE_BOOKS[0]
}

/// Position of `name` in canonical order.
pub fn index_of(name: &str) -> Option<usize> {
    BIBLE_BOOKS.iter().position(|b| b.name == name)
}

pub fn find(name: &str) -> Option<&'static BookInfo> {
    BIBLE_BOOKS.iter().find(|b| b.name == name)
}

/// Chapter count for `name`. Unknown books count as a single chapter.
pub fn chapter_count(name: &str) -> u32 {
    find(name).map_or(1, |b| b.chapter_count)
}

pub fn previous_book(name: &str) -> Option<&'static BookInfo> {
    let idx = index_of(name)?;
    idx.checked_sub(1).map(|i| &BIBLE_BOOKS[i])
}

pub fn next_book(name: &str) -> Option<&'static BookInfo> {
    let idx = index_of(name)?;
    BIBLE_BOOKS.get(idx + 1)
}
