//! # Sale Finalizer
//!
//! Turns the session's cart into a persisted sale and a printable receipt.
//!
//! ## Finalization Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    finalize() Sequence                                  │
//! │                                                                         │
//! │  acquire double-click guard  (second call while running is rejected)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  preconditions: cart non-empty, payment selected,                       │
//! │                 customer present when the store requires one            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT vendas (header, numero_venda assigned by the database)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT itens_venda (one per cart line; NOT atomic with the header:    │
//! │       │  a failure here leaves a header without items)                 │
//! │       ▼                                                                 │
//! │  stock deduction, only when baixa_estoque_na_venda is enabled:         │
//! │       │  per non-temporary line, estoque -= qty and a 'saida' ledger   │
//! │       │  entry; failures are logged and skipped                        │
//! │       ▼                                                                 │
//! │  assemble receipt (company profile + customer + cart snapshot)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  reset cart / customer / payment, release guard                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::Ordering;

use tracing::{info, warn};

use seestore_core::receipt::{Receipt, ReceiptCustomer, ReceiptItem};
use seestore_core::{CartLine, Customer, MovementKind, PaymentMethod, Sale};
use seestore_db::{NewSale, NewSaleItem};

use crate::error::{CheckoutError, CheckoutResult};
use crate::session::CheckoutSession;

/// Result of a successful finalization.
#[derive(Debug, Clone)]
pub struct FinalizedSale {
    /// The persisted header, with the assigned sale number.
    pub sale: Sale,

    /// Fixed-width receipt text, ready for the printer.
    pub receipt_text: String,
}

impl CheckoutSession {
    /// Finalizes the open sale.
    ///
    /// On success the cart and selections are reset for the next customer.
    /// On failure everything already persisted stays persisted (see the
    /// module docs for the non-atomic item insert) and the cart is kept so
    /// the operator can retry.
    pub async fn finalize(&self) -> CheckoutResult<FinalizedSale> {
        if self
            .finalizing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(CheckoutError::sale("Finalização já em andamento"));
        }

        let result = self.finalize_inner().await;
        self.finalizing.store(false, Ordering::SeqCst);
        result
    }

    async fn finalize_inner(&self) -> CheckoutResult<FinalizedSale> {
        self.check_preconditions()?;

        // Snapshot everything while holding the locks briefly; the awaits
        // below run on the snapshot.
        let (lines, subtotal, desconto, total) = {
            let cart = self.cart.lock().unwrap();
            (
                cart.lines().to_vec(),
                cart.subtotal(),
                cart.total_discount(),
                cart.total(),
            )
        };
        let customer: Option<Customer> = self.customer.lock().unwrap().clone();
        let payment: PaymentMethod = self
            .payment
            .lock()
            .unwrap()
            .ok_or_else(|| CheckoutError::sale("Selecione a forma de pagamento"))?;

        let sale = self
            .db
            .sales()
            .create_sale(NewSale {
                cliente_id: customer.as_ref().map(|c| c.id.clone()),
                usuario_id: self.cashier.id.clone(),
                subtotal_centavos: subtotal.centavos(),
                desconto_centavos: desconto.centavos(),
                total_centavos: total.centavos(),
                forma_pagamento: payment,
            })
            .await?;

        let items: Vec<NewSaleItem> = lines
            .iter()
            .map(|line| NewSaleItem {
                produto_id: line.produto_id.clone(),
                quantidade: line.quantidade,
                preco_unitario_centavos: line.preco_venda_centavos,
                desconto_item_centavos: line.desconto_item_centavos,
                subtotal_centavos: line.subtotal_centavos,
            })
            .collect();
        self.db.sales().insert_items(&sale.id, &items).await?;

        if self.settings.baixa_estoque_na_venda {
            self.deduct_stock(&sale, &lines).await;
        }

        let receipt_text = self.render_receipt(&sale, &lines, customer.as_ref()).await?;

        info!(
            numero_venda = sale.numero_venda,
            total_centavos = sale.total_centavos,
            forma_pagamento = ?sale.forma_pagamento,
            "Sale finalized"
        );

        self.reset();

        Ok(FinalizedSale { sale, receipt_text })
    }

    /// Deducts stock and writes `saida` ledger entries for each
    /// non-temporary line. Failures here never fail the sale: the money
    /// already changed hands, so stock inconsistencies are logged for the
    /// reconciliation report instead.
    async fn deduct_stock(&self, sale: &Sale, lines: &[CartLine]) {
        let note = format!("Venda nº {:06}", sale.numero_venda);

        for line in lines.iter().filter(|l| !l.produto_temporario) {
            if let Err(e) = self
                .db
                .products()
                .adjust_stock(&line.produto_id, -line.quantidade)
                .await
            {
                warn!(
                    produto_id = %line.produto_id,
                    error = %e,
                    "Stock deduction failed, skipping line"
                );
                continue;
            }

            if let Err(e) = self
                .db
                .stock()
                .record(
                    &line.produto_id,
                    MovementKind::Saida,
                    line.quantidade,
                    Some(line.preco_venda_centavos),
                    Some(&note),
                )
                .await
            {
                warn!(
                    produto_id = %line.produto_id,
                    error = %e,
                    "Ledger entry for sale deduction failed"
                );
            }
        }
    }

    /// Assembles and renders the receipt. Item names come from the cart
    /// snapshot; the persisted line items carry only product ids.
    async fn render_receipt(
        &self,
        sale: &Sale,
        lines: &[CartLine],
        customer: Option<&Customer>,
    ) -> CheckoutResult<String> {
        let empresa = self.db.company().get().await?;

        let receipt = Receipt {
            empresa,
            numero_venda: sale.numero_venda,
            emitido_em: sale.created_at,
            cliente: customer.map(|c| ReceiptCustomer {
                nome: c.nome.clone(),
                cpf_cnpj: c.cpf.clone(),
            }),
            itens: lines
                .iter()
                .map(|line| ReceiptItem {
                    nome: line.nome.clone(),
                    quantidade: line.quantidade,
                    preco_unitario: line.preco_venda(),
                    desconto: line.desconto_item(),
                    subtotal: line.subtotal(),
                })
                .collect(),
            subtotal: sale.subtotal(),
            desconto: sale.desconto(),
            total: sale.total(),
            forma_pagamento: sale.forma_pagamento,
        };

        Ok(receipt.render())
    }
}
