//! Table Rendering Benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use roster::model::EmployeeView;
use roster::output::{render_table, Table};

fn employee_table(n: usize) -> Table {
    let rows: Vec<EmployeeView> = (0..n)
        .map(|i| EmployeeView {
            id: i as i64 + 1,
            first_name: format!("Zoë{i}"),
            last_name: "Lee".to_string(),
            title: Some("Software Engineer".to_string()),
            department: Some("Engineering".to_string()),
            salary: Some(120_000.0),
            manager: (i % 3 != 0).then(|| "Ann Lee".to_string()),
            role_id: 1,
            manager_id: None,
        })
        .collect();
    Table::from_rows(&rows)
}

fn bench_render(c: &mut Criterion) {
    let small = employee_table(10);
    let large = employee_table(1000);

    c.bench_function("render_table_10", |b| b.iter(|| render_table(black_box(&small))));
    c.bench_function("render_table_1000", |b| b.iter(|| render_table(black_box(&large))));
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
