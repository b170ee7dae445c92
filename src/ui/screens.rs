//! Per-view screen state plus the static support content. The record data
//! itself lives in the session stores; these types only track what the user
//! is pointing at, so every view rereads its store on each draw.

/// Selection state for the scrollable record lists. The owning list length
/// is passed in on every move because the stores grow between key presses.
#[derive(Default)]
pub(crate) struct ListCursor {
    pub(crate) selected: usize,
}

impl ListCursor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn move_selection(&mut self, offset: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let max = len as isize - 1;
        let new = (self.selected as isize + offset).clamp(0, max);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Clamp after the list length changed (a new record was prepended).
    pub(crate) fn ensure_in_bounds(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

/// One tutorial entry in the support center.
pub(crate) struct Tutorial {
    pub(crate) title: &'static str,
    pub(crate) description: &'static str,
    pub(crate) duration: &'static str,
}

pub(crate) const TUTORIALS: &[Tutorial] = &[
    Tutorial {
        title: "Como Registrar Produção de Leite",
        description: "Aprenda a registrar a produção diária de leite da sua fazenda",
        duration: "5 min",
    },
    Tutorial {
        title: "Gerenciamento de Rebanho",
        description: "Como adicionar e acompanhar animais no sistema",
        duration: "8 min",
    },
    Tutorial {
        title: "Calculadora de Receitas",
        description: "Como usar a calculadora para projetar receitas",
        duration: "3 min",
    },
    Tutorial {
        title: "Relatórios e Análises",
        description: "Extraindo insights dos seus dados de produção",
        duration: "10 min",
    },
];

/// One frequently-asked question.
pub(crate) struct Faq {
    pub(crate) question: &'static str,
    pub(crate) answer: &'static str,
}

pub(crate) const FAQS: &[Faq] = &[
    Faq {
        question: "Como posso alterar o preço do leite?",
        answer: "Acesse a seção 'Receitas' e digite o novo preço por litro na calculadora. \
                 O sistema atualizará automaticamente todos os cálculos.",
    },
    Faq {
        question: "Posso registrar produção de dias anteriores?",
        answer: "Sim! Na seção 'Produção Leiteira', informe a data desejada no formulário \
                 antes de inserir os dados.",
    },
    Faq {
        question: "Como adicionar informações sobre a mãe de um animal?",
        answer: "Ao registrar um novo animal na seção 'Rebanho', há um campo opcional \
                 'Nome da Mãe' onde você pode inserir essa informação.",
    },
    Faq {
        question: "O sistema calcula automaticamente a idade dos animais?",
        answer: "Sim! Com base na data de nascimento, o sistema calcula e exibe a idade \
                 de cada animal no momento do cadastro.",
    },
];

/// The three-step onboarding shown at the bottom of the support view.
pub(crate) const GETTING_STARTED: &[(&str, &str)] = &[
    (
        "Configure Seu Rebanho",
        "Comece adicionando os animais da sua fazenda na seção 'Rebanho'",
    ),
    (
        "Registre a Produção",
        "Digite a produção diária de leite na seção 'Produção Leiteira'",
    ),
    (
        "Calcule Receitas",
        "Use a calculadora de receitas para projetar seus ganhos",
    ),
];

/// A way of reaching the support team. `target` is whatever the platform
/// opener understands, so mail and phone links both work.
pub(crate) struct ContactChannel {
    pub(crate) label: &'static str,
    pub(crate) target: &'static str,
}

pub(crate) const CONTACTS: &[ContactChannel] = &[
    ContactChannel {
        label: "✉ suporte@farmanage.com",
        target: "mailto:suporte@farmanage.com",
    },
    ContactChannel {
        label: "✆ (11) 9999-9999",
        target: "tel:+5511999999999",
    },
];

/// State for the support view: which contact is highlighted and how far the
/// static content is scrolled.
pub(crate) struct SupportScreen {
    pub(crate) contact: ListCursor,
    pub(crate) scroll: u16,
}

impl SupportScreen {
    pub(crate) fn new() -> Self {
        Self {
            contact: ListCursor::new(),
            scroll: 0,
        }
    }

    pub(crate) fn scroll_by(&mut self, delta: i16) {
        self.scroll = self.scroll.saturating_add_signed(delta);
    }

    pub(crate) fn current_contact(&self) -> &'static ContactChannel {
        &CONTACTS[self.contact.selected.min(CONTACTS.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_clamps_at_both_ends() {
        let mut cursor = ListCursor::new();
        cursor.move_selection(-3, 5);
        assert_eq!(cursor.selected, 0);
        cursor.move_selection(10, 5);
        assert_eq!(cursor.selected, 4);
        cursor.select_first();
        assert_eq!(cursor.selected, 0);
        cursor.select_last(5);
        assert_eq!(cursor.selected, 4);
    }

    #[test]
    fn cursor_resets_when_list_empties() {
        let mut cursor = ListCursor::new();
        cursor.select_last(5);
        cursor.ensure_in_bounds(0);
        assert_eq!(cursor.selected, 0);
    }

    #[test]
    fn support_selection_cycles_contacts() {
        let mut screen = SupportScreen::new();
        assert_eq!(screen.current_contact().target, "mailto:suporte@farmanage.com");
        screen.contact.move_selection(1, CONTACTS.len());
        assert_eq!(screen.current_contact().target, "tel:+5511999999999");
    }

    #[test]
    fn support_scroll_never_underflows() {
        let mut screen = SupportScreen::new();
        screen.scroll_by(-5);
        assert_eq!(screen.scroll, 0);
        screen.scroll_by(3);
        screen.scroll_by(-1);
        assert_eq!(screen.scroll, 2);
    }
}
