use unicode_segmentation::UnicodeSegmentation;

/// A word on one line; `start`/`end` are char columns, end exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Split a line into checkable words.
///
/// camelCase and kebab-case runs are split into their parts, surrounding
/// apostrophes are trimmed and one-letter parts are dropped. The spans are
/// exact, so a token can be replaced in place.
pub fn tokenize_line(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut run: Vec<(&str, usize)> = Vec::new();
    let mut column = 0;

    for grapheme in line.graphemes(true) {
        let ch = grapheme.chars().next().unwrap_or(' ');
        if ch.is_alphabetic() || ch == '\'' || ch == '-' {
            run.push((grapheme, column));
        } else if !run.is_empty() {
            split_compound(&run, &mut tokens);
            run.clear();
        }
        column += grapheme.chars().count();
    }
    split_compound(&run, &mut tokens);

    tokens
}

fn split_compound(run: &[(&str, usize)], tokens: &mut Vec<Token>) {
    let mut part_start = 0;
    let mut prev_lower = false;

    for (i, &(grapheme, _)) in run.iter().enumerate() {
        let ch = grapheme.chars().next().unwrap_or(' ');
        if ch == '-' {
            emit(&run[part_start..i], tokens);
            part_start = i + 1;
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower {
            emit(&run[part_start..i], tokens);
            part_start = i;
        }
        prev_lower = ch.is_lowercase();
    }
    emit(&run[part_start..], tokens);
}

fn emit(part: &[(&str, usize)], tokens: &mut Vec<Token>) {
    let is_quote = |g: &&str| g.starts_with('\'');
    let Some(first) = part.iter().position(|(g, _)| !is_quote(g)) else {
        return;
    };
    let last = part.iter().rposition(|(g, _)| !is_quote(g)).unwrap_or(first);
    let part = &part[first..=last];
    if part.len() < 2 {
        return;
    }

    let (last_grapheme, last_col) = part[part.len() - 1];
    tokens.push(Token {
        text: part.iter().map(|(g, _)| *g).collect(),
        start: part[0].1,
        end: last_col + last_grapheme.chars().count(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &str) -> Vec<String> {
        tokenize_line(line).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_plain_words() {
        let tokens = tokenize_line("Hello, world! This is a test.");
        assert_eq!(
            tokens.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
            ["Hello", "world", "This", "is", "test"]
        );
        assert_eq!(tokens[1], Token { text: "world".to_string(), start: 7, end: 12 });
    }

    #[test]
    fn test_compound_splitting() {
        assert_eq!(texts("camelCaseWord"), ["camel", "Case", "Word"]);
        assert_eq!(texts("kebab-case"), ["kebab", "case"]);
        assert_eq!(texts("snake_case"), ["snake", "case"]);
        assert_eq!(texts("HTTPServer"), ["HTTPServer"]);
    }

    #[test]
    fn test_compound_spans() {
        let tokens = tokenize_line("a fooBar");
        assert_eq!(tokens[0], Token { text: "foo".to_string(), start: 2, end: 5 });
        assert_eq!(tokens[1], Token { text: "Bar".to_string(), start: 5, end: 8 });
    }

    #[test]
    fn test_apostrophes() {
        assert_eq!(texts("don't 'quoted'"), ["don't", "quoted"]);
        let tokens = tokenize_line("'quoted'");
        assert_eq!((tokens[0].start, tokens[0].end), (1, 7));
    }

    #[test]
    fn test_columns_count_chars() {
        let tokens = tokenize_line("héllo wörld");
        assert_eq!(tokens[1].start, 6);
        assert_eq!(tokens[1].end, 11);
    }
}
