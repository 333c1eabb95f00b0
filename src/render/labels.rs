use crate::core::Language;

/// Fixed texts of the invoice body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceLabels {
    /// Title prefix, followed by the reference.
    pub title: &'static str,
    pub position: &'static str,
    pub quantity: &'static str,
    pub description: &'static str,
    pub total: &'static str,
    pub shipping: &'static str,
    pub invoice_total: &'static str,
}

/// Headings of the QR-bill receipt and payment part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlipLabels {
    pub receipt: &'static str,
    pub payment_part: &'static str,
    pub account_payable_to: &'static str,
    pub additional_information: &'static str,
    pub payable_by: &'static str,
    pub payable_by_blank: &'static str,
    pub currency: &'static str,
    pub amount: &'static str,
    pub acceptance_point: &'static str,
}

impl InvoiceLabels {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::De => Self {
                title: "Rechnung zur Bestellung:",
                position: "Position",
                quantity: "Anzahl",
                description: "Bezeichnung",
                total: "Total",
                shipping: "Versandkosten",
                invoice_total: "Rechnungstotal",
            },
            Language::En => Self {
                title: "Invoice for order:",
                position: "Position",
                quantity: "Quantity",
                description: "Description",
                total: "Total",
                shipping: "Shipping",
                invoice_total: "Invoice total",
            },
            Language::Fr => Self {
                title: "Facture pour la commande :",
                position: "Position",
                quantity: "Quantité",
                description: "Désignation",
                total: "Total",
                shipping: "Frais d'envoi",
                invoice_total: "Total de la facture",
            },
            Language::It => Self {
                title: "Fattura per l'ordine:",
                position: "Posizione",
                quantity: "Quantità",
                description: "Descrizione",
                total: "Totale",
                shipping: "Spese di spedizione",
                invoice_total: "Totale fattura",
            },
        }
    }

    /// `"{title} {reference}"`.
    pub fn title_line(&self, reference: &str) -> String {
        format!("{} {reference}", self.title)
    }
}

impl SlipLabels {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::De => Self {
                receipt: "Empfangsschein",
                payment_part: "Zahlteil",
                account_payable_to: "Konto / Zahlbar an",
                additional_information: "Zusätzliche Informationen",
                payable_by: "Zahlbar durch",
                payable_by_blank: "Zahlbar durch (Name/Adresse)",
                currency: "Währung",
                amount: "Betrag",
                acceptance_point: "Annahmestelle",
            },
            Language::En => Self {
                receipt: "Receipt",
                payment_part: "Payment part",
                account_payable_to: "Account / Payable to",
                additional_information: "Additional information",
                payable_by: "Payable by",
                payable_by_blank: "Payable by (name/address)",
                currency: "Currency",
                amount: "Amount",
                acceptance_point: "Acceptance point",
            },
            Language::Fr => Self {
                receipt: "Récépissé",
                payment_part: "Section paiement",
                account_payable_to: "Compte / Payable à",
                additional_information: "Informations supplémentaires",
                payable_by: "Payable par",
                payable_by_blank: "Payable par (nom/adresse)",
                currency: "Monnaie",
                amount: "Montant",
                acceptance_point: "Point de dépôt",
            },
            Language::It => Self {
                receipt: "Ricevuta",
                payment_part: "Sezione pagamento",
                account_payable_to: "Conto / Pagabile a",
                additional_information: "Informazioni supplementari",
                payable_by: "Pagabile da",
                payable_by_blank: "Pagabile da (nome/indirizzo)",
                currency: "Valuta",
                amount: "Importo",
                acceptance_point: "Punto di accettazione",
            },
        }
    }
}
