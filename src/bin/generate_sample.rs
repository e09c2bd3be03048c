//! Writes `sample_sales.json` in the sales API schema so the dashboard can
//! run offline:
//!
//! ```text
//! cargo run --bin generate_sample -- [path] [rows]
//! SALES_DASHBOARD_SOURCE=sample_sales.json cargo run
//! ```

use serde_json::{json, Value};

const STATES: [(&str, f64, f64); 8] = [
    ("SP", -22.19, -48.79),
    ("RJ", -22.25, -42.66),
    ("MG", -18.10, -44.38),
    ("RS", -30.17, -53.50),
    ("PR", -24.89, -51.55),
    ("BA", -13.29, -41.71),
    ("SC", -27.45, -50.95),
    ("PE", -8.38, -37.86),
];

// (product, category, base price)
const PRODUCTS: [(&str, &str, f64); 10] = [
    ("Modelagem preditiva", "livros", 92.0),
    ("Iniciando em programação", "livros", 80.0),
    ("Smart TV", "eletronicos", 2900.0),
    ("Celular Plus X42", "eletronicos", 2400.0),
    ("Cadeira de escritório", "moveis", 450.0),
    ("Mesa de jantar", "moveis", 900.0),
    ("Bola de basquete", "esporte e lazer", 110.0),
    ("Panela de pressão", "utilidades domesticas", 90.0),
    ("Guitarra", "instrumentos musicais", 1100.0),
    ("Boneca bebê", "brinquedos", 140.0),
];

const SELLERS: [&str; 6] = [
    "Ana Silva",
    "Bruno Sousa",
    "Camila Rodrigues",
    "Juliana Costa",
    "Pedro Gomes",
    "Thiago Silva",
];

const PAYMENT_TYPES: [&str; 4] = ["cartao_credito", "boleto", "cupom", "cartao_debito"];

/// Small deterministic PRNG (xorshift64*), so every run writes the same file.
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng {
            state: seed.wrapping_mul(6364136223846793005).wrapping_add(1) | 1,
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }
}

fn sale(rng: &mut SimpleRng) -> Value {
    let (product, category, base) = *rng.pick(&PRODUCTS);
    let (state, lat, lon) = *rng.pick(&STATES);
    let price = (base * (0.7 + 0.6 * rng.next_f64()) * 100.0).round() / 100.0;
    let freight = price * (0.02 + 0.06 * rng.next_f64());
    let payment = *rng.pick(&PAYMENT_TYPES);
    let installments = if payment == "cartao_credito" { 1 + rng.below(24) } else { 1 };

    json!({
        "Produto": product,
        "Categoria do Produto": category,
        "Preço": price,
        "Frete": freight,
        "Data da Compra": format!(
            "{:02}/{:02}/{}",
            1 + rng.below(28),
            1 + rng.below(12),
            2020 + rng.below(4)
        ),
        "Vendedor": *rng.pick(&SELLERS),
        "Local da compra": state,
        "Avaliação da compra": rng.below(6),
        "Tipo de pagamento": payment,
        "Quantidade de parcelas": installments,
        "lat": lat,
        "lon": lon,
    })
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "sample_sales.json".to_string());
    let rows: usize = match args.next() {
        Some(raw) => raw.parse()?,
        None => 2000,
    };

    let mut rng = SimpleRng::new(42);
    let sales: Vec<Value> = (0..rows).map(|_| sale(&mut rng)).collect();

    std::fs::write(&path, serde_json::to_string_pretty(&sales)?)?;
    println!("Wrote {rows} sales to {path}");
    Ok(())
}
