//! The single dashboard page. Plotly draws the figures returned by
//! `/api/dashboard`; the page itself only polls, fetches and paints.

use crate::domain::model::Regime;

const DATA_SOURCE_URL: &str = "https://www.datos.gov.co/Salud-y-Protecci-n-Social/N-mero-de-afiliados-por-departamento-municipio-y-r/hn4i-593p/about_data";

pub fn render_page() -> String {
    let options: String = Regime::ALL
        .iter()
        .enumerate()
        .map(|(index, regime)| {
            let selected = if index == 0 { " selected" } else { "" };
            format!(
                r#"<option value="{name}"{selected}>{name}</option>"#,
                name = regime.as_str(),
                selected = selected
            )
        })
        .collect();

    PAGE_TEMPLATE
        .replace("__REGIME_OPTIONS__", &options)
        .replace("__DATA_SOURCE_URL__", DATA_SOURCE_URL)
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Dashboard Colombia - Afiliados por Régimen</title>
    <script src="https://cdn.plot.ly/plotly-2.35.2.min.js" charset="utf-8"></script>
    <style>
        body { font-family: sans-serif; padding: 20px; margin: 0; }
        h1 { text-align: center; margin-bottom: 20px; }
        .section { padding: 20px; border-radius: 10px; margin-bottom: 20px; }
        .context { background-color: #f0f8ff; }
        .conclusions { background-color: #fff0f5; margin-top: 30px; }
        #loading-state p { text-align: center; color: #666; }
        #main-content { display: none; }
        .filter { text-align: center; }
        .filter select { width: 50%; padding: 6px; }
        #kpi-cards { display: flex; justify-content: space-around; margin: 20px 0; }
        .kpi-card { padding: 15px; background-color: #e8f4fd; border-radius: 5px; text-align: center; width: 22%; }
        .kpi-card.loading { background-color: #fff3cd; width: 100%; }
        .charts { display: flex; gap: 2%; }
        .charts .map { width: 60%; }
        .charts .box { width: 38%; }
        .narrative { margin-top: 20px; padding: 15px; background-color: #f9f9f9; }
        .narrative p { text-align: justify; }
    </style>
</head>
<body>
    <h1>Dashboard Colombia - Afiliados por Régimen</h1>

    <div class="section context">
        <h2>Contexto</h2>
        <p>
            Este dashboard analiza la distribución de afiliados al sistema de salud en Colombia según los tres regímenes existentes:
            <strong>Contributivo</strong>, <strong>Subsidiado</strong> y <strong>Especial</strong>.
            Los datos provienen del <a href="__DATA_SOURCE_URL__" target="_blank">Portal de Datos Abiertos de Colombia</a>
            y representan la situación actual del sistema de salud colombiano a nivel departamental.
        </p>
        <p>
            El régimen Contributivo se financia con aportes de trabajadores y empleadores, el Subsidiado está dirigido a población
            vulnerable con subsidio estatal, y el Especial cubre grupos específicos como fuerzas armadas y docentes.
        </p>
    </div>

    <div id="loading-state">
        <p>🔄 Cargando datos...</p>
    </div>

    <div id="main-content">
        <div class="filter">
            <h3>Filtro</h3>
            <select id="filtro-regimen">__REGIME_OPTIONS__</select>
        </div>

        <div id="kpi-cards"></div>

        <div class="charts">
            <div class="map">
                <h4>Mapa de Distribución</h4>
                <div id="mapa-colombia"></div>
            </div>
            <div class="box">
                <h4>Distribución por Departamento</h4>
                <div id="boxplot-kpi"></div>
            </div>
        </div>

        <div class="narrative">
            <h4>Análisis y Narrativa</h4>
            <p id="narrativa-texto"></p>
        </div>

        <div class="section conclusions">
            <h2>Conclusiones</h2>
            <ul>
                <li>Existen disparidades significativas en la distribución de afiliados entre departamentos, reflejando diferencias poblacionales y de desarrollo económico.</li>
                <li>El régimen contributivo muestra mayor concentración en áreas urbanas y económicamente desarrolladas.</li>
                <li>El régimen subsidiado presenta una distribución más homogénea a nivel nacional, indicando una cobertura amplia de población vulnerable.</li>
                <li>El régimen especial, aunque con menores números absolutos, es crucial para grupos poblacionales específicos con necesidades particulares.</li>
                <li>La visualización de datos permite identificar oportunidades para mejorar la equidad en el acceso a servicios de salud across el territorio nacional.</li>
            </ul>
            <p>Estos insights pueden informar la toma de decisiones en políticas públicas de salud y la asignación de recursos para reducir las brechas identificadas.</p>
        </div>
    </div>

    <script>
        const select = document.getElementById('filtro-regimen');

        function renderKpis(kpis) {
            const panel = document.getElementById('kpi-cards');
            panel.replaceChildren();
            const card = (value, label, extraClass) => {
                const div = document.createElement('div');
                div.className = 'kpi-card' + (extraClass ? ' ' + extraClass : '');
                const h4 = document.createElement('h4');
                h4.textContent = value;
                const p = document.createElement('p');
                p.textContent = label;
                div.append(h4, p);
                return div;
            };
            if (kpis.kind === 'cards') {
                kpis.cards.forEach(c => panel.append(card(c.value, c.label)));
            } else if (kpis.kind === 'loading') {
                panel.append(card(kpis.icon, kpis.message, 'loading'));
            } else {
                const div = document.createElement('div');
                div.textContent = kpis.message;
                panel.append(div);
            }
        }

        async function refresh() {
            const regime = encodeURIComponent(select.value);
            const response = await fetch('/api/dashboard?regimen=' + regime);
            if (!response.ok) {
                document.getElementById('narrativa-texto').textContent = (await response.json()).error;
                return;
            }
            const view = await response.json();
            Plotly.react('mapa-colombia', view.map.data, view.map.layout, {scrollZoom: false});
            Plotly.react('boxplot-kpi', view.distribution.data, view.distribution.layout);
            renderKpis(view.kpis);
            document.getElementById('narrativa-texto').textContent = view.narrative;
        }

        async function waitForData() {
            try {
                const status = await (await fetch('/api/status')).json();
                if (status.show_content) {
                    document.getElementById('loading-state').style.display = 'none';
                    document.getElementById('main-content').style.display = 'block';
                    await refresh();
                    return;
                }
            } catch (e) {
                console.error(e);
            }
            setTimeout(waitForData, 1000);
        }

        select.addEventListener('change', refresh);
        waitForData();
    </script>
</body>
</html>
"#;
