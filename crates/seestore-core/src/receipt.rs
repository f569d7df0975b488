//! # Receipt Renderer
//!
//! Turns a finished sale into fixed-width text for an 80mm thermal printer.
//!
//! Pure: the renderer takes an already-assembled [`Receipt`] (including the
//! emission timestamp) and returns a `String`. No clock reads, no I/O and no
//! persistence happen here, so the same input always yields the same text.

use chrono::{DateTime, Utc};

use crate::money::Money;
use crate::types::{CompanyProfile, PaymentMethod};

/// Printable columns on an 80mm thermal roll.
pub const RECEIPT_WIDTH: usize = 42;

// =============================================================================
// Receipt Data
// =============================================================================

/// One item as printed, carrying the name and the cart-frozen figures.
///
/// Item names come from the cart snapshot, not from the persisted sale rows,
/// which store only product ids.
#[derive(Debug, Clone)]
pub struct ReceiptItem {
    pub nome: String,
    pub quantidade: i64,
    pub preco_unitario: Money,
    pub desconto: Money,
    pub subtotal: Money,
}

/// Customer block, printed only when the sale was linked to a customer.
#[derive(Debug, Clone)]
pub struct ReceiptCustomer {
    pub nome: String,
    pub cpf_cnpj: Option<String>,
}

/// Everything the renderer needs, assembled by the finalizer.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub empresa: CompanyProfile,
    pub numero_venda: i64,
    pub emitido_em: DateTime<Utc>,
    pub cliente: Option<ReceiptCustomer>,
    pub itens: Vec<ReceiptItem>,
    pub subtotal: Money,
    pub desconto: Money,
    pub total: Money,
    pub forma_pagamento: PaymentMethod,
}

impl Receipt {
    /// Renders the receipt as fixed-width text.
    ///
    /// ## Layout
    /// ```text
    /// ==========================================
    ///                MINHA LOJA                      (centered header)
    ///        CNPJ: 00.000.000/0001-00
    /// ==========================================
    /// VENDA Nº 000042
    /// DATA/HORA: 05/03/2026 14:30:00
    /// ------------------------------------------
    /// CLIENTE: MARIA DA SILVA                         (optional block)
    /// ------------------------------------------
    /// ITENS
    /// CAFE TORRADO 500G
    ///   2 x R$ 5,00                       R$ 10,00
    /// ------------------------------------------
    /// SUBTOTAL:                           R$ 10,00
    /// TOTAL:                              R$ 10,00
    /// FORMA DE PAGAMENTO: DINHEIRO
    /// ==========================================
    ///        OBRIGADO PELA PREFERÊNCIA!
    ///               VOLTE SEMPRE!
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();

        // Header
        push_rule(&mut out, '=');
        push_centered(&mut out, &self.empresa.nome.to_uppercase());
        if let Some(cnpj) = &self.empresa.cnpj {
            push_centered(&mut out, &format!("CNPJ: {}", cnpj));
        }
        if let Some(endereco) = &self.empresa.endereco {
            push_centered(&mut out, endereco);
        }
        if let Some(telefone) = &self.empresa.telefone {
            push_centered(&mut out, &format!("TEL: {}", telefone));
        }
        push_rule(&mut out, '=');

        // Sale identification
        out.push_str(&format!("VENDA Nº {:06}\n", self.numero_venda));
        out.push_str(&format!(
            "DATA/HORA: {}\n",
            self.emitido_em.format("%d/%m/%Y %H:%M:%S")
        ));
        push_rule(&mut out, '-');

        // Customer block
        if let Some(cliente) = &self.cliente {
            out.push_str(&format!("CLIENTE: {}\n", cliente.nome.to_uppercase()));
            if let Some(doc) = &cliente.cpf_cnpj {
                out.push_str(&format!("CPF/CNPJ: {}\n", doc));
            }
            push_rule(&mut out, '-');
        }

        // Items
        out.push_str("ITENS\n");
        for item in &self.itens {
            out.push_str(&truncate(&item.nome.to_uppercase(), RECEIPT_WIDTH));
            out.push('\n');
            push_two_col(
                &mut out,
                &format!("  {} x {}", item.quantidade, item.preco_unitario.format_brl()),
                &item.subtotal.format_brl(),
            );
            if !item.desconto.is_zero() {
                push_two_col(
                    &mut out,
                    "  DESCONTO ITEM:",
                    &format!("-{}", item.desconto.format_brl()),
                );
            }
        }
        push_rule(&mut out, '-');

        // Totals
        push_two_col(&mut out, "SUBTOTAL:", &self.subtotal.format_brl());
        if !self.desconto.is_zero() {
            push_two_col(
                &mut out,
                "DESCONTO:",
                &format!("-{}", self.desconto.format_brl()),
            );
        }
        push_two_col(&mut out, "TOTAL:", &self.total.format_brl());
        out.push_str(&format!(
            "FORMA DE PAGAMENTO: {}\n",
            self.forma_pagamento.receipt_label()
        ));

        // Footer
        push_rule(&mut out, '=');
        push_centered(&mut out, "OBRIGADO PELA PREFERÊNCIA!");
        push_centered(&mut out, "VOLTE SEMPRE!");

        out
    }
}

// =============================================================================
// Layout helpers
// =============================================================================

fn push_rule(out: &mut String, ch: char) {
    for _ in 0..RECEIPT_WIDTH {
        out.push(ch);
    }
    out.push('\n');
}

fn push_centered(out: &mut String, text: &str) {
    let text = truncate(text, RECEIPT_WIDTH);
    let len = text.chars().count();
    let pad = (RECEIPT_WIDTH - len) / 2;
    for _ in 0..pad {
        out.push(' ');
    }
    out.push_str(&text);
    out.push('\n');
}

/// Left text, right text, padded so the right edge lands on the last column.
/// When the two sides would collide the line degrades to a single space gap.
fn push_two_col(out: &mut String, left: &str, right: &str) {
    let left_len = left.chars().count();
    let right_len = right.chars().count();
    out.push_str(left);
    if left_len + right_len < RECEIPT_WIDTH {
        for _ in 0..(RECEIPT_WIDTH - left_len - right_len) {
            out.push(' ');
        }
    } else {
        out.push(' ');
    }
    out.push_str(right);
    out.push('\n');
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_receipt() -> Receipt {
        Receipt {
            empresa: CompanyProfile {
                id: "empresa-1".to_string(),
                nome: "Mercado Bom Preço".to_string(),
                cnpj: Some("00.000.000/0001-00".to_string()),
                endereco: None,
                telefone: None,
            },
            numero_venda: 42,
            emitido_em: Utc.with_ymd_and_hms(2026, 3, 5, 14, 30, 0).unwrap(),
            cliente: None,
            itens: vec![ReceiptItem {
                nome: "Café Torrado 500g".to_string(),
                quantidade: 2,
                preco_unitario: Money::from_centavos(500),
                desconto: Money::zero(),
                subtotal: Money::from_centavos(1000),
            }],
            subtotal: Money::from_centavos(1000),
            desconto: Money::zero(),
            total: Money::from_centavos(1000),
            forma_pagamento: PaymentMethod::Dinheiro,
        }
    }

    #[test]
    fn test_render_basic_sale() {
        let text = sample_receipt().render();

        assert!(text.contains("MERCADO BOM PREÇO"));
        assert!(text.contains("CNPJ: 00.000.000/0001-00"));
        assert!(text.contains("VENDA Nº 000042"));
        assert!(text.contains("DATA/HORA: 05/03/2026 14:30:00"));
        assert!(text.contains("CAFÉ TORRADO 500G"));
        assert!(text.contains("2 x R$ 5,00"));
        assert!(text.contains("R$ 10,00"));
        assert!(text.contains("FORMA DE PAGAMENTO: DINHEIRO"));
        assert!(text.contains("OBRIGADO PELA PREFERÊNCIA!"));
        assert!(text.contains("VOLTE SEMPRE!"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let receipt = sample_receipt();
        assert_eq!(receipt.render(), receipt.render());
    }

    #[test]
    fn test_discount_lines_only_when_present() {
        let mut receipt = sample_receipt();
        assert!(!receipt.render().contains("DESCONTO"));

        receipt.itens[0].desconto = Money::from_centavos(100);
        receipt.itens[0].subtotal = Money::from_centavos(900);
        receipt.desconto = Money::from_centavos(100);
        receipt.total = Money::from_centavos(900);
        receipt.forma_pagamento = PaymentMethod::Pix;

        let text = receipt.render();
        assert!(text.contains("DESCONTO ITEM:"));
        assert!(text.contains("-R$ 1,00"));
        assert!(text.contains("DESCONTO:"));
        assert!(text.contains("R$ 9,00"));
        assert!(text.contains("FORMA DE PAGAMENTO: PIX"));
    }

    #[test]
    fn test_customer_block_optional() {
        let mut receipt = sample_receipt();
        assert!(!receipt.render().contains("CLIENTE:"));

        receipt.cliente = Some(ReceiptCustomer {
            nome: "Maria da Silva".to_string(),
            cpf_cnpj: Some("123.456.789-00".to_string()),
        });
        let text = receipt.render();
        assert!(text.contains("CLIENTE: MARIA DA SILVA"));
        assert!(text.contains("CPF/CNPJ: 123.456.789-00"));
    }

    #[test]
    fn test_lines_fit_the_roll() {
        let mut receipt = sample_receipt();
        receipt.itens.push(ReceiptItem {
            nome: "Produto com um nome extraordinariamente longo que não cabe na bobina"
                .to_string(),
            quantidade: 1,
            preco_unitario: Money::from_centavos(123_456_789),
            desconto: Money::zero(),
            subtotal: Money::from_centavos(123_456_789),
        });

        for line in receipt.render().lines() {
            assert!(
                line.chars().count() <= RECEIPT_WIDTH,
                "line too wide: {:?}",
                line
            );
        }
    }

    #[test]
    fn test_rules_use_full_width() {
        let text = sample_receipt().render();
        assert!(text.contains(&"=".repeat(RECEIPT_WIDTH)));
        assert!(text.contains(&"-".repeat(RECEIPT_WIDTH)));
    }
}
