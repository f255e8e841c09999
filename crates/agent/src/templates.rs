//! Phrasing template bank
//!
//! Each response family has several variants; the assembler picks one per
//! turn through the session rotation so consecutive replies never read
//! the same. Placeholders: `{product}`, `{category}`, `{count}`,
//! `{cross}`, `{ask}`, `{time}`.

use std::collections::HashMap;

/// Template bank keyed by family name
#[derive(Debug, Clone)]
pub struct TemplateBank {
    families: HashMap<String, Vec<String>>,
}

impl TemplateBank {
    /// Built-in Portuguese bank
    pub fn default_pt() -> Self {
        let mut families = HashMap::new();

        families.insert(
            "greeting".to_string(),
            vec![
                "Oi! Tudo bem? Me diz o que você está procurando hoje. 😊".to_string(),
                "Olá! Bem-vindo(a)! Posso te ajudar a encontrar algum produto?".to_string(),
                "E aí! Que bom te ver por aqui. O que você quer ver hoje?".to_string(),
                "Oi, tudo certo? Pode falar: celular, perfume, tênis... o que precisar!".to_string(),
                "Olá! Estou por aqui pra te ajudar nas compras. Por onde começamos?".to_string(),
            ],
        );

        families.insert(
            "help".to_string(),
            vec![
                "Eu te ajudo a achar produtos! Pode pedir, por exemplo: \"celular até 1500\" ou \"perfume mais barato\".".to_string(),
                "Funciona assim: você me diz o produto (e o preço, se quiser) e eu busco no catálogo. Ex.: \"fone de ouvido até 200\".".to_string(),
                "Posso buscar produtos, filtrar por preço e sugerir acessórios. Experimenta: \"tênis entre 100 e 300\".".to_string(),
                "É só pedir! Digite o que procura, tipo \"notebook barato\" ou \"iphone 15 até 3000\".".to_string(),
            ],
        );

        families.insert(
            "time_query".to_string(),
            vec![
                "Agora são {time}. Aproveita pra dar uma olhada nas ofertas! 😉".to_string(),
                "São {time} por aqui. Posso te mostrar alguma coisa enquanto isso?".to_string(),
                "{time} em ponto! Quer aproveitar pra ver algum produto?".to_string(),
                "Deixa eu ver... {time}. E aí, vamos às compras?".to_string(),
            ],
        );

        families.insert(
            "who_am_i".to_string(),
            vec![
                "Sou o assistente virtual da loja! Me conta o que você procura que eu acho pra você.".to_string(),
                "Eu sou um robô vendedor 🤖 — especialista em achar produto bom e barato.".to_string(),
                "Sou seu assistente de compras. Pergunte por qualquer produto do catálogo!".to_string(),
                "Assistente virtual, às ordens! Produto, preço, sugestão... é comigo mesmo.".to_string(),
            ],
        );

        families.insert(
            "results".to_string(),
            vec![
                "Encontrei {count} opção(ões) de {product} pra você:".to_string(),
                "Olha o que eu achei de {product}:".to_string(),
                "Boa escolha! Separei estas opções de {product}:".to_string(),
                "Aqui vão {count} resultado(s) de {product}:".to_string(),
                "Tem {product} sim! Dá uma olhada:".to_string(),
            ],
        );

        families.insert(
            "not_found".to_string(),
            vec![
                "Puxa, não encontrei nada de {product} com esses filtros. 😕".to_string(),
                "Hmm, não achei {product} assim. Quer tentar outro preço ou modelo?".to_string(),
                "Nada de {product} por aqui no momento. Posso procurar algo parecido?".to_string(),
                "Não rolou: {product} não apareceu na busca. Tenta mudar algum filtro?".to_string(),
            ],
        );

        families.insert(
            "clarification".to_string(),
            vec![
                "Só pra eu acertar na busca: {ask}".to_string(),
                "Me ajuda com um detalhe? {ask}".to_string(),
                "Boa! Antes de buscar: {ask}".to_string(),
                "Entendi quase tudo. {ask}".to_string(),
            ],
        );

        families.insert(
            "unknown".to_string(),
            vec![
                "Desculpa, não entendi. 😅 Pode me dizer qual produto você procura?".to_string(),
                "Hmm, essa eu não peguei. Tenta me dizer um produto, tipo \"celular\" ou \"perfume\".".to_string(),
                "Não consegui entender. Me fala o nome de um produto que eu busco pra você!".to_string(),
                "Ainda estou aprendendo! Me diz um produto ou categoria que eu encontro.".to_string(),
            ],
        );

        families.insert(
            "cross_sell".to_string(),
            vec![
                "Aproveita e dá uma olhada em: {cross}. 😉".to_string(),
                "Quem leva isso costuma gostar de: {cross}.".to_string(),
                "Posso te sugerir também: {cross}?".to_string(),
                "Combina bem com: {cross}!".to_string(),
            ],
        );

        Self { families }
    }

    /// Variants for a family; empty slice when the family is unknown
    pub fn variants(&self, family: &str) -> &[String] {
        self.families
            .get(family)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Replace a family (config override path)
    pub fn set_family(&mut self, family: impl Into<String>, variants: Vec<String>) {
        self.families.insert(family.into(), variants);
    }
}

impl Default for TemplateBank {
    fn default() -> Self {
        Self::default_pt()
    }
}
