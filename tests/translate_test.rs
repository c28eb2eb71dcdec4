use pretty_assertions::assert_eq;
use textsql::prelude::*;
use textsql::translate;
use textsql::translator::SAMPLE_SENTENCES;

#[test]
fn test_empty_input() {
    for input in ["", " ", "\t\n  "] {
        assert_eq!(translate(input), "Empty input.");
    }
}

#[test]
fn test_no_table() {
    for input in ["hello there", "what is the weather like", "order_date > 2023-01-01"] {
        assert_eq!(translate(input), "Could not detect table.");
    }
}

#[test]
fn test_show_all() {
    assert_eq!(translate("Show all students"), "SELECT * FROM students;");
}

#[test]
fn test_named_fields() {
    assert_eq!(translate("Get name and age of students"), "SELECT name, age FROM students;");
}

#[test]
fn test_comparison_and_equality() {
    assert_eq!(
        translate("Show employees with salary >= 50000 and department equals sales"),
        "SELECT * FROM employees WHERE salary >= 50000 AND department = 'sales';"
    );
}

#[test]
fn test_date_after() {
    assert_eq!(
        translate("Show orders placed after date 2023-01-01"),
        "SELECT * FROM orders WHERE order_date > '2023-01-01';"
    );
    assert_eq!(
        translate("Orders before 2022-12-31"),
        "SELECT * FROM orders WHERE order_date < '2022-12-31';"
    );
}

#[test]
fn test_between_is_one_clause() {
    let translator = Translator::default();
    let tr = translator
        .analyze("List orders where order_date between 2023-01-01 and 2023-03-31")
        .unwrap();
    assert_eq!(tr.query.filter.clauses.len(), 1);
    assert_eq!(
        tr.sql,
        "SELECT * FROM orders WHERE order_date BETWEEN '2023-01-01' AND '2023-03-31';"
    );
}

#[test]
fn test_between_then_more_conditions() {
    assert_eq!(
        translate("List products where price between 100 and 500 and category equals toys"),
        "SELECT * FROM products WHERE price BETWEEN 100 AND 500 AND category = 'toys';"
    );
}

#[test]
fn test_or_connector() {
    assert_eq!(
        translate("Show products where stock < 10 or price < 50"),
        "SELECT * FROM products WHERE stock < 10 OR price < 50;"
    );
}

#[test]
fn test_phrase_operators() {
    assert_eq!(
        translate("Show customers with age greater than 25 and city equals delhi"),
        "SELECT * FROM customers WHERE age > 25 AND city = 'delhi';"
    );
    assert_eq!(
        translate("students with score at least 80"),
        "SELECT * FROM students WHERE score >= 80;"
    );
}

#[test]
fn test_string_values() {
    assert_eq!(
        translate("Get orders where amount > 2000 and status = pending"),
        "SELECT * FROM orders WHERE amount > 2000 AND status = 'pending';"
    );
    assert_eq!(
        translate("Get customers where email = abc@example.com"),
        "SELECT * FROM customers WHERE email = 'abc@example.com';"
    );
}

#[test]
fn test_connector_words_inside_values() {
    assert_eq!(
        translate("Get customers where email = john.and.jane@x.com"),
        "SELECT * FROM customers WHERE email = 'john.and.jane@x.com';"
    );
    assert_eq!(
        translate("List products where category = black-and-white"),
        "SELECT * FROM products WHERE category = 'black-and-white';"
    );
    assert_eq!(
        translate("Get orders where status = not-shipped or amount > 100"),
        "SELECT * FROM orders WHERE status = 'not-shipped' OR amount > 100;"
    );
}

#[test]
fn test_not_connector() {
    assert_eq!(
        translate("orders where amount > 100 and not status = cancelled"),
        "SELECT * FROM orders WHERE amount > 100 AND NOT (status = 'cancelled');"
    );
}

#[test]
fn test_join_either_direction() {
    // customers precedes orders in the schema, so the edge is used in reverse
    assert_eq!(
        translate("Show orders and customers"),
        "SELECT * FROM customers JOIN orders ON orders.customer_id = customers.id;"
    );
    assert_eq!(
        translate("show customers name and orders amount"),
        "SELECT customers.name, orders.amount FROM customers \
         JOIN orders ON orders.customer_id = customers.id;"
    );
}

#[test]
fn test_cross_join_when_unrelated() {
    assert_eq!(
        translate("show students and employees"),
        "SELECT * FROM students, employees;"
    );
}

#[test]
fn test_singular_fallback() {
    assert_eq!(
        translate("every order where amount > 10"),
        "SELECT * FROM orders WHERE amount > 10;"
    );
}

#[test]
fn test_custom_schema() {
    let schema = Schema::new(
        vec![
            Table::new("authors", &["id", "name", "country"]),
            Table::new("books", &["id", "author_id", "title", "year"]),
        ],
        vec![ForeignKey::new("books", "author_id", "authors", "id")],
        vec![],
    )
    .unwrap();
    let translator = Translator::new(schema);
    assert_eq!(
        translator.translate("title of books with year > 1990"),
        "SELECT title FROM books WHERE year > 1990;"
    );
    assert_eq!(
        translator.translate("authors and books where country = chile"),
        "SELECT * FROM authors JOIN books ON books.author_id = authors.id WHERE country = 'chile';"
    );
    assert_eq!(translator.translate("show all students"), "Could not detect table.");
}

#[test]
fn test_samples_always_terminate() {
    for sentence in SAMPLE_SENTENCES {
        let sql = translate(sentence);
        assert!(sql.starts_with("SELECT "), "{} -> {}", sentence, sql);
        assert!(sql.ends_with(';'), "{} -> {}", sentence, sql);
    }
}

#[test]
fn test_concurrent_callers() {
    let translator = Translator::default();
    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                assert_eq!(translator.translate("Show all students"), "SELECT * FROM students;");
            });
        }
    });
}
