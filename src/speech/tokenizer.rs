use super::phoneme::{self, PhonemeDescriptor, FALLBACK, GAP, MAX_RULE_LEN};

/// Lowercases the text and expands diacritics into the ASCII spellings the rule table knows.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        let expansion = match c {
            'ä' | 'æ' => "ae",
            'ö' | 'ø' => "oe",
            'ü' => "ue",
            'ß' => "ss",
            'å' => "aa",
            'é' | 'è' | 'ê' | 'ë' => "e",
            'á' | 'à' | 'â' => "a",
            'í' | 'ì' | 'î' | 'ï' => "i",
            'ó' | 'ò' | 'ô' => "o",
            'ú' | 'ù' | 'û' => "u",
            'ç' => "c",
            'ñ' => "n",
            _ => {
                out.push(c);
                continue;
            }
        };
        out.push_str(expansion);
    }
    out
}

/// Splits text into an ordered sequence of phoneme descriptors.
///
/// At each position the longest matching rule wins. Whitespace always becomes
/// a short silence, and anything the table doesn't know becomes a generic
/// voiced consonant. Empty and whitespace-only text yield no phonemes.
pub fn tokenize(text: &str) -> Vec<PhonemeDescriptor> {
    if text.trim().is_empty() {
        return vec![];
    }

    let chars: Vec<char> = normalize(text).chars().collect();
    let mut tokens = Vec::with_capacity(chars.len());
    let mut key = String::with_capacity(4 * MAX_RULE_LEN);

    let mut pos = 0;
    while pos < chars.len() {
        if chars[pos].is_whitespace() {
            tokens.push(GAP);
            pos += 1;
            continue;
        }

        let longest = MAX_RULE_LEN.min(chars.len() - pos);
        let matched = (1..=longest).rev().find_map(|len| {
            let window = &chars[pos..pos + len];
            if window.iter().any(|c| c.is_whitespace()) {
                return None;
            }
            key.clear();
            key.extend(window);
            phoneme::lookup(&key).map(|descriptor| (len, *descriptor))
        });

        match matched {
            Some((len, descriptor)) => {
                tokens.push(descriptor);
                pos += len;
            }
            None => {
                tokens.push(FALLBACK);
                pos += 1;
            }
        }
    }

    tokens
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::speech::phoneme::lookup;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Grüße"), "gruesse");
        assert_eq!(normalize("CAFÉ"), "cafe");
        assert_eq!(normalize("Ærø"), "aeroe");
        assert_eq!(normalize("hello world"), "hello world");
    }

    #[test]
    fn test_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
        assert!(tokenize("\t\n").is_empty());
    }

    #[test]
    fn test_longest_match() {
        assert_eq!(tokenize("sch"), vec![*lookup("sch").unwrap()]);
        assert_eq!(tokenize("sh"), vec![*lookup("sh").unwrap()]);
        assert_eq!(
            tokenize("scha"),
            vec![*lookup("sch").unwrap(), *lookup("a").unwrap()]
        );
        assert_eq!(
            tokenize("sing"),
            vec![*lookup("s").unwrap(), *lookup("i").unwrap(), *lookup("ng").unwrap()]
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(tokenize("SCH"), tokenize("sch"));
        assert_eq!(tokenize("Hello"), tokenize("hello"));
    }

    #[test]
    fn test_whitespace_is_silence() {
        let tokens = tokenize("a b");
        assert_eq!(tokens.len(), 3);
        assert!(tokens[1].silence);
        assert_eq!(tokens[1].duration, phoneme::WORD_GAP);

        // Whitespace breaks up what would otherwise be a digraph
        let tokens = tokenize("s h");
        assert_eq!(tokens, vec![*lookup("s").unwrap(), GAP, *lookup("h").unwrap()]);
    }

    #[test]
    fn test_diacritics_match_digraphs() {
        assert_eq!(tokenize("ä"), vec![*lookup("ae").unwrap()]);
        assert_eq!(tokenize("ö"), tokenize("oe"));
        assert_eq!(tokenize("ß"), vec![*lookup("s").unwrap(), *lookup("s").unwrap()]);
    }

    #[test]
    fn test_fallback() {
        assert_eq!(tokenize("1"), vec![FALLBACK]);
        assert_eq!(tokenize("a?"), vec![*lookup("a").unwrap(), FALLBACK]);
    }
}
