use keyed_subtract::processing::subtract;
use keyed_subtract::row::{SampleRow, SingleValueRow};

fn main() {
    let a = vec![
        SampleRow::new("a", 10, 0),
        SampleRow::new("b", 20, 0),
        SampleRow::new("c", 30, 0),
    ];
    let b = vec![SampleRow::new("c", 3, 0), SampleRow::new("b", 2, 0)];

    println!("a: {a:?}");
    println!("b: {b:?}");
    let c = subtract(&a, &b);
    println!("c: {c:?}");

    let a = vec![
        SingleValueRow::new("a", 10),
        SingleValueRow::new("b", 20),
        SingleValueRow::new("c", 30),
    ];
    let b = vec![SingleValueRow::new("c", 3), SingleValueRow::new("b", 2)];

    println!("a: {a:?}");
    println!("b: {b:?}");
    let c = subtract(&a, &b);
    println!("c: {c:?}");
}
