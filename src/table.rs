//! Projection of sales records into display rows.

use crate::model::SalesRecord;

/// The header row of the projected table.
pub const HEADER: [&str; 4] = ["ID", "Car", "Price", "Total Sales"];

/// Turns `records` into rows of text, header first, one row per record in input order.
///
/// The price column is the original price text, not the parsed value.
pub fn project<'r>(records: impl IntoIterator<Item = &'r SalesRecord>) -> Vec<Vec<String>> {
    let records = records.into_iter();
    let mut rows = Vec::with_capacity(records.size_hint().0 + 1);
    rows.push(HEADER.iter().map(|h| h.to_string()).collect());
    for record in records {
        rows.push(vec![
            record.id.to_string(),
            record.car.to_string(),
            record.price.clone(),
            record.total_sales.to_string(),
        ]);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Car;

    #[test]
    fn test_project() {
        let records = vec![
            SalesRecord::new(2, Car::new("Mercedes-Benz", "E-Class", 2009), "$18000.00", 1000),
            SalesRecord::new(1, Car::new("Acura", "Integra", 1995), "$500.00", 1192),
        ];
        let rows = project(&records);
        assert_eq!(rows.len(), records.len() + 1);
        assert_eq!(rows[0], ["ID", "Car", "Price", "Total Sales"]);
        // input order is preserved, not sorted by id
        assert_eq!(
            rows[1],
            ["2", "Mercedes-Benz E-Class (2009)", "$18000.00", "1000"]
        );
        assert_eq!(rows[2], ["1", "Acura Integra (1995)", "$500.00", "1192"]);
        for (row, record) in rows.iter().skip(1).zip(&records) {
            assert_eq!(
                row[1],
                format!(
                    "{} {} ({})",
                    record.car.make, record.car.model, record.car.year
                )
            );
        }
    }

    #[test]
    fn test_project_keeps_price_text_verbatim() {
        let records = vec![SalesRecord::new(
            5,
            Car::new("Kia", "Rio", 2012),
            " $1,000.5 ",
            3,
        )];
        let rows = project(&records);
        assert_eq!(rows[1][2], " $1,000.5 ");
    }

    #[test]
    fn test_project_empty() {
        let rows = project(&Vec::<SalesRecord>::new());
        assert_eq!(rows, vec![HEADER.to_vec()]);
    }
}
