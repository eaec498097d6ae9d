// Instruction template wrapped around every résumé before it is sent for rewriting.
// Product copy, not logic: edit the wording here, keep the `{resume_text}` placeholder.

/// Fixed rewrite directive. `{resume_text}` is replaced with the extracted text.
pub const ATS_REWRITE_PROMPT_TEMPLATE: &str = "\
Você é um especialista em recrutamento e em sistemas de triagem automática de currículos (ATS). \
Reescreva o currículo abaixo para que seja lido corretamente por um ATS, seguindo estas regras:
- Use apenas texto simples: remova emojis, ícones, marcadores decorativos, tabelas, colunas e caracteres especiais.
- Mantenha somente informações pessoais e profissionais (contato, resumo, experiência, formação, competências, idiomas, certificações).
- Não invente nem exagere informações; preserve datas, cargos, empresas e números.
- Use títulos de seção convencionais e verbos de ação no início das frases.
- Responda apenas com o currículo reescrito, sem comentários, explicações ou formatação Markdown.

Currículo:
{resume_text}";

pub fn build_rewrite_prompt(resume_text: &str) -> String {
    ATS_REWRITE_PROMPT_TEMPLATE.replace("{resume_text}", resume_text)
}
