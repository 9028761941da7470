//! Identifier transforms shared by the converter and the emitters

/// Split an identifier into words at case boundaries and separators
///
/// `orderItems` → `["order", "Items"]`, `HTTPRequest` → `["HTTP", "Request"]`,
/// `line items` → `["line", "items"]`.
pub fn split_words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// `orderItem` → `ORDER_ITEM`
pub fn upper_snake_case(text: &str) -> String {
    split_words(text)
        .iter()
        .map(|w| w.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// `orderItem` → `order_item`
pub fn snake_case(text: &str) -> String {
    split_words(text)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Strip one trailing `s`
///
/// Deliberately naive: `purchases` → `purchase`, `friend` → `friend`.
pub fn singularize(word: &str) -> &str {
    let trimmed = word.trim();
    if trimmed.chars().count() > 1 {
        if let Some(stripped) = trimmed.strip_suffix(|c: char| c == 's' || c == 'S') {
            return stripped;
        }
    }
    trimmed
}

/// Identifier safe to use as a PlantUML alias or DOT node id
///
/// Every emitter and extractor goes through this function so both render
/// passes agree on element names.
pub fn diagram_alias(name: &str) -> String {
    let mut alias: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if alias.is_empty() || alias.starts_with(|c: char| c.is_ascii_digit()) {
        alias.insert(0, '_');
    }
    alias
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("orderItems"), vec!["order", "Items"]);
        assert_eq!(split_words("HTTPRequest"), vec!["HTTP", "Request"]);
        assert_eq!(split_words("line items"), vec!["line", "items"]);
        assert_eq!(split_words("line-item_count"), vec!["line", "item", "count"]);
        assert_eq!(split_words("address2Line"), vec!["address2", "Line"]);
        assert!(split_words("  ").is_empty());
    }

    #[test]
    fn test_upper_snake_case() {
        assert_eq!(upper_snake_case("purchase"), "PURCHASE");
        assert_eq!(upper_snake_case("orderItem"), "ORDER_ITEM");
        assert_eq!(upper_snake_case("best friend"), "BEST_FRIEND");
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("ShoppingCart"), "shopping_cart");
        assert_eq!(snake_case("firstName"), "first_name");
    }

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("purchases"), "purchase");
        assert_eq!(singularize("friend"), "friend");
        assert_eq!(singularize("Items"), "Item");
        assert_eq!(singularize("s"), "s");
        assert_eq!(singularize(" products "), "product");
    }

    #[test]
    fn test_diagram_alias() {
        assert_eq!(diagram_alias("ShoppingCart"), "ShoppingCart");
        assert_eq!(diagram_alias("Shopping Cart"), "Shopping_Cart");
        assert_eq!(diagram_alias("Order-Line"), "Order_Line");
        assert_eq!(diagram_alias("3D Model"), "_3D_Model");
        assert_eq!(diagram_alias(""), "_");
    }
}
