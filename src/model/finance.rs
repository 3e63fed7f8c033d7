//! The fixed vocabularies used to classify transactions.
//!
//! Every enum is serialized by the label shown to the user, so the same string is used in the
//! database, in JSON output and on the command line. Lower-case English aliases are accepted when
//! parsing so that `--status pending` works as well as `--status Pendente`.

use serde::{Deserialize, Serialize};

/// Whether a transaction takes money out of, or brings money into, the household.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Expense,
    Income,
}

serde_plain::derive_display_from_serialize!(Origin);
serde_plain::derive_fromstr_from_deserialize!(Origin);

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "Pago", alias = "paid")]
    Paid,
    #[serde(rename = "Pendente", alias = "pending")]
    Pending,
    #[serde(rename = "Cancelado", alias = "canceled")]
    Canceled,
}

serde_plain::derive_display_from_serialize!(PaymentStatus);
serde_plain::derive_fromstr_from_deserialize!(PaymentStatus);

/// How an expense was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaymentType {
    #[serde(rename = "Crédito", alias = "credit")]
    Credit,
    #[serde(rename = "Débito", alias = "debit")]
    Debit,
    #[serde(rename = "Dinheiro", alias = "cash")]
    Cash,
    #[serde(rename = "Pix", alias = "pix")]
    Pix,
}

serde_plain::derive_display_from_serialize!(PaymentType);
serde_plain::derive_fromstr_from_deserialize!(PaymentType);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IncomeCategory {
    #[serde(rename = "Salário", alias = "salary")]
    Salary,
    #[serde(rename = "Serviços", alias = "services")]
    Services,
    #[serde(rename = "Investimentos", alias = "investments")]
    Investments,
    #[serde(rename = "Freelance", alias = "freelance")]
    Freelance,
    #[serde(rename = "Bônus", alias = "bonus")]
    Bonus,
    #[serde(rename = "Outros", alias = "others")]
    Others,
}

serde_plain::derive_display_from_serialize!(IncomeCategory);
serde_plain::derive_fromstr_from_deserialize!(IncomeCategory);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    #[serde(rename = "Casa", alias = "housing")]
    Housing,
    #[serde(rename = "Transporte", alias = "transportation")]
    Transportation,
    #[serde(rename = "Carro", alias = "car")]
    Car,
    #[serde(rename = "Supermercado", alias = "groceries")]
    Groceries,
    #[serde(rename = "Alimentação fora de casa", alias = "dining")]
    Dining,
    #[serde(rename = "Despesas pessoais", alias = "personal")]
    Personal,
    #[serde(rename = "Vestuário", alias = "clothing")]
    Clothing,
    #[serde(rename = "Saúde", alias = "health")]
    Health,
    #[serde(rename = "Educação e cursos", alias = "education")]
    Education,
    #[serde(rename = "Investimentos", alias = "investments")]
    Investments,
    #[serde(rename = "Lazer e entretenimento", alias = "entertainment")]
    Entertainment,
    #[serde(rename = "Viagem", alias = "travel")]
    Travel,
    #[serde(rename = "Assinaturas e serviços", alias = "subscriptions")]
    Subscriptions,
    #[serde(rename = "Presentes e doações", alias = "gifts")]
    Gifts,
    #[serde(rename = "Cuidados com pets", alias = "pets")]
    Pets,
    #[serde(rename = "Serviços domésticos", alias = "home_services")]
    HomeServices,
    #[serde(rename = "Manutenção e reparos", alias = "maintenance")]
    Maintenance,
    #[serde(rename = "Impostos e taxas", alias = "taxes")]
    Taxes,
    #[serde(rename = "Tecnologia", alias = "technology")]
    Technology,
    #[serde(rename = "Seguros", alias = "insurance")]
    Insurance,
    #[serde(rename = "Bem-estar", alias = "wellness")]
    Wellness,
    #[serde(rename = "Cuidados com crianças", alias = "childcare")]
    Childcare,
    #[serde(rename = "Outros", alias = "others")]
    Others,
}

serde_plain::derive_display_from_serialize!(ExpenseCategory);
serde_plain::derive_fromstr_from_deserialize!(ExpenseCategory);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display_uses_labels() {
        assert_eq!(Origin::Expense.to_string(), "expense");
        assert_eq!(PaymentStatus::Pending.to_string(), "Pendente");
        assert_eq!(PaymentType::Credit.to_string(), "Crédito");
        assert_eq!(ExpenseCategory::Dining.to_string(), "Alimentação fora de casa");
        assert_eq!(IncomeCategory::Bonus.to_string(), "Bônus");
    }

    #[test]
    fn test_parse_label_and_alias() {
        assert_eq!(
            PaymentStatus::from_str("Cancelado").unwrap(),
            PaymentStatus::Canceled
        );
        assert_eq!(
            PaymentStatus::from_str("canceled").unwrap(),
            PaymentStatus::Canceled
        );
        assert_eq!(
            ExpenseCategory::from_str("Saúde").unwrap(),
            ExpenseCategory::Health
        );
        assert_eq!(
            ExpenseCategory::from_str("home_services").unwrap(),
            ExpenseCategory::HomeServices
        );
        assert_eq!(Origin::from_str("income").unwrap(), Origin::Income);
    }

    #[test]
    fn test_parse_unknown_label_fails() {
        assert!(ExpenseCategory::from_str("Lanches").is_err());
        assert!(Origin::from_str("transfer").is_err());
    }

    #[test]
    fn test_default_status_is_paid() {
        assert_eq!(PaymentStatus::default(), PaymentStatus::Paid);
    }
}
