/// Bijective base-26 column name: 1 -> A, 26 -> Z, 27 -> AA, 703 -> AAA.
/// Zero has no column name and yields an empty string.
pub fn column_letters(mut column: usize) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push(b'A' + rem as u8);
        column = (column - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// `"{category}!A1:{last column}{row_count}"`, the rectangle a table of
/// `column_count` x `row_count` cells covers from the top-left corner.
pub fn compute_range(category: &str, column_count: usize, row_count: usize) -> String {
    format!("{}!A1:{}{}", category, column_letters(column_count), row_count)
}
