use serde::Serialize;

/// A display block produced by [`format`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    List { items: Vec<String> },
}

enum Line<'a> {
    Blank,
    Heading(u8, &'a str),
    Bullet(&'a str),
    Text(&'a str),
}

const MAX_HEADING_LEVEL: u8 = 3;
const BULLET_MARKERS: [char; 3] = ['-', '*', '•'];

fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if line.is_empty() {
        return Line::Blank;
    }

    // '#' is one byte, so the count is also a byte offset.
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if let Ok(level) = u8::try_from(hashes) {
        if (1..=MAX_HEADING_LEVEL).contains(&level) {
            if let Some(rest) = line[hashes..].strip_prefix(' ') {
                let text = rest.trim();
                if !text.is_empty() {
                    return Line::Heading(level, text);
                }
            }
        }
    }

    for marker in BULLET_MARKERS {
        if let Some(rest) = line.strip_prefix(marker) {
            if let Some(item) = rest.strip_prefix(' ') {
                let item = item.trim();
                if !item.is_empty() {
                    return Line::Bullet(item);
                }
            }
        }
    }

    Line::Text(line)
}

#[derive(Default)]
struct Builder {
    blocks: Vec<Block>,
    paragraph: Vec<String>,
    items: Vec<String>,
}

impl Builder {
    fn flush_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            let text = self.paragraph.join(" ");
            self.paragraph.clear();
            self.blocks.push(Block::Paragraph { text });
        }
    }

    fn flush_list(&mut self) {
        if !self.items.is_empty() {
            let items = std::mem::take(&mut self.items);
            self.blocks.push(Block::List { items });
        }
    }

    fn flush(&mut self) {
        self.flush_paragraph();
        self.flush_list();
    }
}

/// Split explanation text into headings, paragraphs and bullet lists.
///
/// Lines are classified one by one: a `#`/`##`/`###` marker starts a heading,
/// a `-`, `*` or `•` marker adds to the current list, a blank line closes the
/// open paragraph or list, and any other line joins the current paragraph.
/// `**strong**` spans stay in the block text; see [`super::inline_spans`].
#[must_use]
pub fn format(text: &str) -> Vec<Block> {
    let mut builder = Builder::default();

    for raw in text.lines() {
        match classify(raw) {
            Line::Blank => builder.flush(),
            Line::Heading(level, heading) => {
                builder.flush();
                builder.blocks.push(Block::Heading {
                    level,
                    text: heading.to_string(),
                });
            }
            Line::Bullet(item) => {
                builder.flush_paragraph();
                builder.items.push(item.to_string());
            }
            Line::Text(line) => {
                builder.flush_list();
                builder.paragraph.push(line.to_string());
            }
        }
    }

    builder.flush();
    builder.blocks
}
