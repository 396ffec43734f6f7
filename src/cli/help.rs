use crate::domain::ProjectConfig;
use crate::services::registry::service_action_list;

const GLOBAL_SECTIONS: &str = "\
🚀 Comandos Básicos:
  up                    Inicia todos os serviços
  down                  Para todos os serviços
  restart               Reinicia todos os serviços
  rebuild [serviço]     Reconstrói e inicia todos ou um serviço específico
  logs [serviço]        Exibe logs de todos ou um serviço específico
  ps                    Mostra status dos contêineres

🛠️  Comandos Avançados:
  shell [serviço]       Abre shell no serviço (padrão: backend)
  stats                 Mostra estatísticas em tempo real
  health                Verifica saúde de todos os serviços
  volumes               Lista volumes do projeto
  backup [serviço]      Faz backup (redis, backend ou all)
  restore <arquivo>     Restaura backup especificado
  monitor               Monitor em tempo real (Ctrl+C para sair)
  update                Atualiza todas as imagens

⚙️  Manutenção:
  prune                 Remove recursos não utilizados
  clean                 Limpeza profunda (interativa)
  config                Mostra a configuração atual
  scan                  Escaneia o projeto em busca de serviços";

const EXAMPLES: &str = "\
Exemplos:
  dockctl up
  dockctl logs backend
  dockctl shell redis
  dockctl backup redis
  dockctl backend shell
  dockctl monitor";

/// Usage text listing global commands and the configured services
pub fn help_text(config: &ProjectConfig) -> String {
    let mut text = format!(
        "\n🐳 {} Docker CLI - Comandos Disponíveis\n\n\
         Uso: dockctl [comando] [subcomando] [parâmetro]\n\n\
         {GLOBAL_SECTIONS}\n\n\
         Serviços disponíveis:\n",
        config.project_name
    );

    let actions = service_action_list();
    for service in config.services.names() {
        text.push_str(&format!(
            "  {service} [subcomando]   Gerencia o serviço {service} ({actions})\n"
        ));
    }

    text.push('\n');
    text.push_str(EXAMPLES);
    text
}
