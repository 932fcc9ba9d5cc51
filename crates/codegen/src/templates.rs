//! TypeScript rendering templates.
//!
//! This is the only layer that knows what the target framework's decorators
//! look like; the planner hands over capability tags and the contexts built
//! in [`crate::emit`] turn them into TypeGraphQL syntax.

use handlebars::Handlebars;
use serde_json::Value;
use typegql_core::GeneratorError;

pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    pub fn new() -> Result<Self, GeneratorError> {
        let mut handlebars = Handlebars::new();
        // Generated output is source code, not HTML.
        handlebars.register_escape_fn(handlebars::no_escape);

        let register = |hb: &mut Handlebars, name: &str, template: &str| {
            hb.register_template_string(name, template).map_err(|e| {
                GeneratorError::Template(format!("failed to register template `{name}`: {e}"))
            })
        };
        register(&mut handlebars, "class", CLASS_TEMPLATE)?;
        register(&mut handlebars, "enum", ENUM_TEMPLATE)?;
        register(&mut handlebars, "resolver", RESOLVER_TEMPLATE)?;
        register(&mut handlebars, "relations", RELATIONS_TEMPLATE)?;
        register(&mut handlebars, "index", INDEX_TEMPLATE)?;

        Ok(Self { handlebars })
    }

    pub fn render(&self, template: &str, data: &Value) -> Result<String, GeneratorError> {
        self.handlebars
            .render(template, data)
            .map_err(|e| GeneratorError::Template(format!("rendering `{template}`: {e}")))
    }
}

/// Args types, input types, output types and model classes all share the
/// decorated-class shape; the `decorator` slot selects ArgsType, InputType
/// or ObjectType.
static CLASS_TEMPLATE: &str = r#"import * as TypeGraphQL from "type-graphql";
{{#each imports}}{{this}}
{{/each}}
@TypeGraphQL.{{decorator}}()
export class {{symbol}} {
{{#each fields}}  @TypeGraphQL.Field(_type => {{gql_type}}, {
    nullable: {{nullable}}
  })
  {{declaration}};

{{/each}}}
"#;

static ENUM_TEMPLATE: &str = r#"import * as TypeGraphQL from "type-graphql";

export enum {{symbol}} {
{{#each values}}  {{this}} = "{{this}}",
{{/each}}}

TypeGraphQL.registerEnumType({{symbol}}, {
  name: "{{symbol}}",
});
"#;

static RESOLVER_TEMPLATE: &str = r#"import * as TypeGraphQL from "type-graphql";
{{#each imports}}{{this}}
{{/each}}
@TypeGraphQL.Resolver(_of => {{entity}})
export class {{symbol}} {
  @TypeGraphQL.{{exposure}}(_returns => {{return_gql}}, {
    nullable: {{nullable}}
  })
  async {{method}}(@TypeGraphQL.Ctx() ctx: any{{args_param}}): Promise<{{return_ts}}> {
    return ctx.prisma.{{client_entity}}.{{operation}}({{invoke_args}});
  }
}
"#;

static RELATIONS_TEMPLATE: &str = r#"import * as TypeGraphQL from "type-graphql";
{{#each imports}}{{this}}
{{/each}}
@TypeGraphQL.Resolver(_of => {{entity}})
export class {{symbol}} {
{{#each methods}}  @TypeGraphQL.FieldResolver(_type => {{return_gql}}, {
    nullable: {{nullable}}
  })
  async {{name}}(@TypeGraphQL.Root() {{root}}: {{../entity}}, @TypeGraphQL.Ctx() ctx: any{{args_param}}): Promise<{{return_ts}}> {
    return ctx.prisma.{{client_entity}}.findUnique({
      where: {
        {{root_key}}: {{root}}.{{root_key}},
      },
    }).{{name}}({{invoke_args}});
  }

{{/each}}}
"#;

static INDEX_TEMPLATE: &str = r#"{{#each exports}}export { {{symbol}} } from "./{{module}}";
{{/each}}"#;
