//! Text rendering of fetched documents.

/// Drop everything between `<` and `>` and decode `&lt;` / `&gt;` in the
/// remaining text.
pub fn strip_tags(body: &str) -> String {
    let mut text = String::with_capacity(body.len());
    let mut in_tag = false;
    for c in body.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.replace("&lt;", "<").replace("&gt;", ">")
}
