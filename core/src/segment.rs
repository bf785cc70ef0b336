use crate::{InvertedIndex, Posting};
use anyhow::{anyhow, Context, Result};
use std::io::Write;

/// Serialize one term's posting line: `"<term>: <docID>,<weight> ...\n"`.
/// A term with no postings in this interval serializes as `"<term>: \n"`,
/// a bare space before the newline.
pub fn write_line<W: Write>(w: &mut W, term: &str, postings: &[Posting]) -> Result<()> {
    write!(w, "{term}:")?;
    if postings.is_empty() {
        write!(w, " ")?;
    } else {
        for p in postings {
            write!(w, " {},{:.2}", p.doc_id, p.weight)?;
        }
    }
    writeln!(w)?;
    Ok(())
}

/// Serialize a whole in-memory index, one line per term in insertion
/// order.
pub fn write_segment<W: Write>(w: &mut W, index: &InvertedIndex) -> Result<()> {
    for (term, postings) in index.iter() {
        write_line(w, term, postings)?;
    }
    Ok(())
}

/// Parse one line back into its term and postings. The trailing newline
/// may be present or already stripped; a postings field that is only the
/// newline means the term had no postings.
pub fn parse_line(line: &str) -> Result<(String, Vec<Posting>)> {
    let (term, rest) = line
        .split_once(": ")
        .ok_or_else(|| anyhow!("malformed index line: {line:?}"))?;
    let rest = rest.trim_end_matches('\n');
    let mut postings = Vec::new();
    if !rest.is_empty() {
        for field in rest.split(' ') {
            let (doc, weight) = field
                .split_once(',')
                .ok_or_else(|| anyhow!("malformed posting {field:?} in line for {term:?}"))?;
            postings.push(Posting {
                doc_id: doc
                    .parse()
                    .with_context(|| format!("bad docID in posting {field:?}"))?,
                weight: weight
                    .parse()
                    .with_context(|| format!("bad weight in posting {field:?}"))?,
            });
        }
    }
    Ok((term.to_string(), postings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_postings() {
        let mut idx = InvertedIndex::new();
        idx.push("cat", Posting { doc_id: 1, weight: 1.78 });
        idx.push("cat", Posting { doc_id: 3, weight: 1.0 });
        idx.push("dog", Posting { doc_id: 2, weight: 1.48 });
        let mut buf = Vec::new();
        write_segment(&mut buf, &idx).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "cat: 1,1.78 3,1.00\ndog: 2,1.48\n");

        for (line, (term, postings)) in text.lines().zip(idx.iter()) {
            let (t, ps) = parse_line(line).unwrap();
            assert_eq!(t, term);
            assert_eq!(ps, postings);
        }
    }

    #[test]
    fn empty_posting_list_is_a_bare_space() {
        let mut buf = Vec::new();
        write_line(&mut buf, "cat", &[]).unwrap();
        assert_eq!(buf, b"cat: \n");
        let (term, postings) = parse_line("cat: \n").unwrap();
        assert_eq!(term, "cat");
        assert!(postings.is_empty());
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_line("no separator here").is_err());
        assert!(parse_line("cat: 1;1.00\n").is_err());
        assert!(parse_line("cat: x,1.00\n").is_err());
    }
}
