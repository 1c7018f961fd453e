use super::*;

#[test]
fn clean_html_strips_markup() {
    let html = r#"
        <html>
          <body>
            <h3>AI model breaks benchmark record</h3>
            <div><span>Tech Daily</span><time>2 hours ago</time></div>
            <a>More</a>
          </body>
        </html>
    "#;

    let text = clean_html_to_text(html);
    assert_eq!(
        text,
        "AI model breaks benchmark record\nTech Daily\n2 hours ago\nMore"
    );
}

#[test]
fn extracts_first_line_of_each_block() {
    let text = "\
AI model breaks benchmark record
Tech Daily
2 hours ago
More
Chip shortage easing, analysts say
Wire Service
5 hours ago
More";

    assert_eq!(
        extract_headlines(text),
        "AI model breaks benchmark record\nChip shortage easing, analysts say"
    );
}

#[test]
fn keeps_trailing_block_without_marker() {
    let text = "\
First headline
Source A
More
Second headline
Source B";

    assert_eq!(extract_headlines(text), "First headline\nSecond headline");
}

#[test]
fn consecutive_markers_and_blanks_are_ignored() {
    let text = "More\n\nMore\nOnly headline\n\nMore\nMore";
    assert_eq!(extract_headlines(text), "Only headline");
}

#[test]
fn empty_input_yields_empty_output() {
    assert_eq!(extract_headlines(""), "");
    assert_eq!(extract_headlines("\n\n  \n"), "");
}

#[test]
fn reddit_titles_drop_chrome_lines() {
    let text = "\
Search results for rust
r/rust
What is the idiomatic way to handle errors in a large project?
1.2k upvotes
342 comments
Sort by: new
u/some_user
Rust 1.80 release megathread and discussion of new features";

    let titles = extract_reddit_titles(text);
    assert_eq!(
        titles,
        "What is the idiomatic way to handle errors in a large project?\n\
         Rust 1.80 release megathread and discussion of new features"
    );
}
