use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, FnArg, Ident, ItemFn, Pat, ReturnType, Type};

/// Operand fields an `#[opcode]` parameter can be bound to. Each one is an
/// accessor of the same name on `Instruction`.
const OPERAND_FIELDS: [&str; 6] = ["x", "y", "n", "nn", "nnn", "word"];

/// Turns an instruction routine into a dispatchable handler.
///
/// Parameters tagged with an operand attribute (`#[x]`, `#[y]`, `#[n]`,
/// `#[nn]`, `#[nnn]`, `#[word]`) are pulled out of the instruction word;
/// untagged parameters (the machine state) are kept. The generated function
/// takes the untagged parameters followed by the `Instruction` and returns
/// `OpResult`. A routine without a return type always succeeds.
///
/// ```ignore
/// #[opcode]
/// pub fn load_immediate(state: &mut Chip8State, #[x] x: usize, #[nn] nn: u8) {
///     *state.register_mut(x) = nn;
/// }
/// ```
#[proc_macro_attribute]
pub fn opcode(_args: TokenStream, input: TokenStream) -> TokenStream {
    let mut function_item = parse_macro_input!(input as ItemFn);

    let mut operand_names = vec![];
    let mut operand_fields = vec![];

    let mut member_names = vec![];
    let mut member_types: Vec<Type> = vec![];

    let mut call_arguments = vec![];

    for argument in &mut function_item.sig.inputs {
        let argument = match argument {
            FnArg::Typed(argument) => argument,
            FnArg::Receiver(receiver) => {
                return syn::Error::new_spanned(receiver, "#[opcode] routines cannot take self")
                    .to_compile_error()
                    .into();
            }
        };
        let variable_name = match argument.pat.as_ref() {
            Pat::Ident(variable_name) => variable_name.ident.clone(),
            other => {
                return syn::Error::new_spanned(other, "#[opcode] parameters must be plain names")
                    .to_compile_error()
                    .into();
            }
        };

        if let Some(attribute) = argument.attrs.first() {
            let field = match attribute.path().get_ident() {
                Some(field) if OPERAND_FIELDS.contains(&field.to_string().as_str()) => {
                    field.clone()
                }
                _ => {
                    return syn::Error::new_spanned(
                        attribute,
                        "expected one of #[x], #[y], #[n], #[nn], #[nnn], #[word]",
                    )
                    .to_compile_error()
                    .into();
                }
            };
            operand_names.push(variable_name.clone());
            operand_fields.push(field);
            argument.attrs.clear();
        } else {
            member_names.push(variable_name.clone());
            member_types.push(*argument.ty.clone());
        }
        call_arguments.push(variable_name);
    }

    let attributes = &function_item.attrs;
    let visibility = &function_item.vis;
    let function_name = &function_item.sig.ident;
    let inputs = &function_item.sig.inputs;
    let output = &function_item.sig.output;
    let body = &function_item.block;

    let semantics = Ident::new("semantics", Span::call_site());
    let call = match output {
        ReturnType::Default => quote! {
            #semantics(#(#call_arguments),*);
            Ok(())
        },
        ReturnType::Type(..) => quote! {
            #semantics(#(#call_arguments),*)
        },
    };

    quote! {
        #(#attributes)*
        #[allow(unused_variables)]
        #visibility fn #function_name(
            #(#member_names: #member_types,)*
            instruction: crate::Instruction,
        ) -> crate::OpResult {
            #[inline(always)]
            fn #semantics(#inputs) #output #body

            #(let #operand_names = instruction.#operand_fields();)*
            #call
        }
    }
    .into()
}
